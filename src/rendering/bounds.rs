//! Axis-aligned bounding boxes for mesh normalization
//!
//! Board and piece normalization both work from the box enclosing a model,
//! first in model space and then again after the model transform is applied.

use bevy::mesh::VertexAttributeValues;
use bevy::prelude::*;

/// Axis-aligned bounding box, always non-empty (`min <= max` per axis)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds3 {
    /// Box enclosing a single point
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Box enclosing every point, `None` when there are none
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_point(first), |mut bounds, point| {
            bounds.include(point);
            bounds
        }))
    }

    /// Box enclosing the `POSITION` attribute of a Bevy mesh
    pub fn from_mesh(mesh: &Mesh) -> Option<Self> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION)? {
            VertexAttributeValues::Float32x3(positions) => {
                Self::from_points(positions.iter().map(|p| Vec3::from_array(*p)))
            }
            _ => None,
        }
    }

    /// Grows the box to contain `point`
    pub fn include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Bounds3) -> Bounds3 {
        Bounds3 {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Box enclosing this box after `transform` is applied to its corners
    pub fn transformed(&self, transform: &Transform) -> Bounds3 {
        let corners = (0..8).map(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        });
        let mut moved = corners.map(|corner| transform.transform_point(corner));
        // Eight corners always exist
        let first = moved.next().unwrap_or(self.min);
        moved.fold(Self::from_point(first), |mut bounds, point| {
            bounds.include(point);
            bounds
        })
    }
}
