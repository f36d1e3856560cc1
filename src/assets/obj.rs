//! Wavefront OBJ parsing into named triangle meshes
//!
//! A single OBJ document may hold several named objects (`o` / `g`
//! statements); the pieces file relies on this to carry all twelve piece
//! archetypes. Vertex, normal and texture-coordinate pools are shared by the
//! whole document, faces are fan-triangulated and flattened so every object
//! becomes an independent non-indexed triangle list.
//!
//! Supported statements: `v`, `vn`, `vt`, `f`, `o`, `g`, `#`. Material and
//! smoothing statements (`mtllib`, `usemtl`, `s`) as well as lines and points
//! are ignored.

use super::error::ObjError;
use crate::rendering::bounds::Bounds3;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;

/// Flattened triangle-list geometry of one object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Three consecutive entries form one triangle
    pub positions: Vec<[f32; 3]>,
    /// Empty unless every vertex referenced a normal
    pub normals: Vec<[f32; 3]>,
    /// Empty unless every vertex referenced a texture coordinate
    pub uvs: Vec<[f32; 2]>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// True when the geometry is a usable triangle list
    pub fn is_renderable(&self) -> bool {
        !self.positions.is_empty() && self.positions.len() % 3 == 0
    }

    pub fn bounds(&self) -> Option<Bounds3> {
        Bounds3::from_points(self.positions.iter().map(|p| Vec3::from_array(*p)))
    }

    /// Builds a Bevy mesh, computing flat normals when the file had none
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions.clone());

        if !self.normals.is_empty() && self.normals.len() == self.positions.len() {
            mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals.clone());
        } else {
            mesh.compute_flat_normals();
        }

        if !self.uvs.is_empty() && self.uvs.len() == self.positions.len() {
            mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs.clone());
        }

        mesh
    }
}

/// One named object of an OBJ document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjObject {
    /// Trimmed name from the `o`/`g` statement; empty for faces before any
    pub name: String,
    pub mesh: MeshData,
}

/// A parsed OBJ document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjModel {
    pub objects: Vec<ObjObject>,
}

impl ObjModel {
    /// Box enclosing every object, `None` for an empty model
    pub fn bounds(&self) -> Option<Bounds3> {
        self.objects
            .iter()
            .filter_map(|object| object.mesh.bounds())
            .reduce(|a, b| a.union(&b))
    }

    pub fn vertex_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.vertex_count()).sum()
    }
}

/// Object being assembled while faces stream in
#[derive(Default)]
struct ObjectBuilder {
    name: String,
    mesh: MeshData,
    all_normals: bool,
    all_uvs: bool,
}

impl ObjectBuilder {
    fn named(name: String) -> Self {
        Self {
            name,
            mesh: MeshData::default(),
            all_normals: true,
            all_uvs: true,
        }
    }

    fn has_faces(&self) -> bool {
        !self.mesh.positions.is_empty()
    }

    fn finish(mut self) -> ObjObject {
        if !self.all_normals {
            self.mesh.normals.clear();
        }
        if !self.all_uvs {
            self.mesh.uvs.clear();
        }
        ObjObject {
            name: self.name,
            mesh: self.mesh,
        }
    }
}

/// One corner of a face: position index plus optional uv/normal indices
type FaceVertex = (usize, Option<usize>, Option<usize>);

/// Parses an OBJ document
pub fn parse_obj(text: &str) -> Result<ObjModel, ObjError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();

    let mut objects = Vec::new();
    let mut current = ObjectBuilder::named(String::new());

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword {
            "v" => positions.push(parse_floats(parts, line_no, "v", 3)?),
            "vn" => normals.push(parse_floats(parts, line_no, "vn", 3)?),
            "vt" => uvs.push(parse_floats(parts, line_no, "vt", 1)?),
            "o" | "g" => {
                let name = line[keyword.len()..].trim().to_string();
                if current.has_faces() {
                    let finished = std::mem::replace(&mut current, ObjectBuilder::named(name));
                    objects.push(finished.finish());
                } else {
                    current.name = name;
                }
            }
            "f" => {
                let corners = parts
                    .map(|token| {
                        parse_face_vertex(token, positions.len(), uvs.len(), normals.len())
                            .map_err(|message| ObjError::Parse {
                                line: line_no,
                                message,
                            })
                    })
                    .collect::<Result<Vec<FaceVertex>, ObjError>>()?;

                if corners.len() < 3 {
                    debug!(
                        "[OBJ] Skipping face with {} vertices at line {}",
                        corners.len(),
                        line_no
                    );
                    continue;
                }

                // Fan triangulation
                for i in 1..corners.len() - 1 {
                    for &(p, t, n) in &[corners[0], corners[i], corners[i + 1]] {
                        current.mesh.positions.push(positions[p]);
                        match n {
                            Some(n) => current.mesh.normals.push(normals[n]),
                            None => current.all_normals = false,
                        }
                        match t {
                            Some(t) => current.mesh.uvs.push(uvs[t]),
                            None => current.all_uvs = false,
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if current.has_faces() {
        objects.push(current.finish());
    }

    Ok(ObjModel { objects })
}

/// Reads up to `N` floats, requiring at least `required`; missing optional
/// components are zero
fn parse_floats<'a, const N: usize>(
    parts: impl Iterator<Item = &'a str>,
    line: usize,
    keyword: &str,
    required: usize,
) -> Result<[f32; N], ObjError> {
    let mut values = [0.0; N];
    let mut count = 0;
    for (slot, token) in values.iter_mut().zip(parts) {
        *slot = token.parse::<f32>().map_err(|_| ObjError::Parse {
            line,
            message: format!("invalid number `{}` in `{}` statement", token, keyword),
        })?;
        count += 1;
    }
    if count < required {
        return Err(ObjError::Parse {
            line,
            message: format!(
                "`{}` needs {} components, found {}",
                keyword, required, count
            ),
        });
    }
    Ok(values)
}

/// Parses `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn parse_face_vertex(
    token: &str,
    position_count: usize,
    uv_count: usize,
    normal_count: usize,
) -> Result<FaceVertex, String> {
    let mut fields = token.split('/');
    let position = match fields.next() {
        Some(field) if !field.is_empty() => resolve_index(field, position_count, "vertex")?,
        _ => return Err(format!("face vertex `{}` has no position index", token)),
    };
    let uv = match fields.next() {
        Some(field) if !field.is_empty() => Some(resolve_index(field, uv_count, "texture")?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(field) if !field.is_empty() => Some(resolve_index(field, normal_count, "normal")?),
        _ => None,
    };
    Ok((position, uv, normal))
}

/// Converts a 1-based (or negative, relative) OBJ index to a 0-based one
fn resolve_index(field: &str, count: usize, what: &str) -> Result<usize, String> {
    let raw: i64 = field
        .parse()
        .map_err(|_| format!("invalid {} index `{}`", what, field))?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => (count as i64 + r).try_into().ok(),
    };
    match resolved {
        Some(i) if i < count => Ok(i),
        _ => Err(format!(
            "{} index {} out of range ({} defined)",
            what, raw, count
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OBJECTS: &str = "\
# two pieces
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
o White_Pawn
f 1//1 2//1 3//1
o  Black_Pawn
usemtl dark
f 1 2 3 4
";

    #[test]
    fn test_parse_named_objects() {
        //! `o` statements split the document into named objects; names are
        //! trimmed and vertex pools are shared.
        let model = parse_obj(TWO_OBJECTS).unwrap();
        assert_eq!(model.objects.len(), 2);
        assert_eq!(model.objects[0].name, "White_Pawn");
        assert_eq!(model.objects[1].name, "Black_Pawn");
        assert_eq!(model.objects[0].mesh.vertex_count(), 3);
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let model = parse_obj(TWO_OBJECTS).unwrap();
        let quad = &model.objects[1].mesh;
        assert_eq!(quad.vertex_count(), 6);
        assert_eq!(quad.positions[3], [0.0, 0.0, 0.0]);
        assert_eq!(quad.positions[5], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_normals_kept_only_when_complete() {
        //! The first object references a normal on every corner; the second
        //! references none, so it gets no normals (flat normals later).
        let model = parse_obj(TWO_OBJECTS).unwrap();
        assert_eq!(model.objects[0].mesh.normals.len(), 3);
        assert!(model.objects[1].mesh.normals.is_empty());
        assert!(model.objects[1].mesh.uvs.is_empty());
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let text = "v 0 0 0\nv 2 0 0\nv 0 2 0\nf -3 -2 -1\n";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.objects[0].mesh.positions[1], [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_faces_before_any_object_have_empty_name() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.objects.len(), 1);
        assert_eq!(model.objects[0].name, "");
    }

    #[test]
    fn test_objects_without_faces_are_dropped() {
        //! An `o` with no faces is renamed by the next `o`, never emitted.
        let text = "o Empty\no Board\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\ng Trailing\n";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.objects.len(), 1);
        assert_eq!(model.objects[0].name, "Board");
    }

    #[test]
    fn test_out_of_range_index_reports_line() {
        let text = "v 0 0 0\nv 1 0 0\n\nf 1 2 7\n";
        match parse_obj(text) {
            Err(ObjError::Parse { line, message }) => {
                assert_eq!(line, 4);
                assert!(message.contains("out of range"), "{}", message);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_index_is_invalid() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        assert!(parse_obj(text).is_err());
    }

    #[test]
    fn test_invalid_number_is_error() {
        let err = parse_obj("v 0 zero 0\n").unwrap_err();
        assert_eq!(
            err,
            ObjError::Parse {
                line: 1,
                message: "invalid number `zero` in `v` statement".to_string()
            }
        );
    }

    #[test]
    fn test_missing_vertex_component_is_error() {
        assert!(parse_obj("v 1 2\n").is_err());
    }

    #[test]
    fn test_model_bounds_cover_all_objects() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 5 5 5\nv 6 5 5\nv 5 6 5\n\
                    o A\nf 1 2 3\no B\nf 4 5 6\n";
        let bounds = parse_obj(text).unwrap().bounds().unwrap();
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(6.0, 6.0, 5.0));
    }

    #[test]
    fn test_empty_document_has_no_bounds() {
        let model = parse_obj("# nothing here\n").unwrap();
        assert!(model.objects.is_empty());
        assert!(model.bounds().is_none());
    }

    #[test]
    fn test_to_mesh_computes_flat_normals() {
        let model = parse_obj("v 0 0 0\nv 1 0 0\nv 0 0 -1\nf 1 2 3\n").unwrap();
        let mesh = model.objects[0].mesh.to_mesh();
        assert_eq!(mesh.count_vertices(), 3);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
    }
}
