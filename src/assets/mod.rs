//! Asset fetching, OBJ parsing and load coordination
//!
//! - `source` - where models come from and how they are fetched
//! - `obj` - Wavefront OBJ text into named triangle meshes
//! - `coordinator` - counting settled attempts, single-fire completion
//! - `loading` - the Bevy systems driving fetch tasks

pub mod coordinator;
pub mod error;
pub mod loading;
pub mod obj;
pub mod source;

pub use coordinator::{AssetsSettled, LoadCoordinator, LoadProgress, LoadProgressed, LoadUpdate};
pub use error::{AssetError, AssetResult, ObjError};
pub use loading::{
    fetch_all, planned_fetches, AssetLoadingPlugin, FetchRole, FetchTask, LoadingSystems,
    ModelFetched,
};
pub use obj::{parse_obj, MeshData, ObjModel, ObjObject};
pub use source::{decode_model, AssetSource};
