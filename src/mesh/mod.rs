pub mod grouped_mesh;
pub mod topology;
pub mod vertex_group;

// Re-export meshes and traits
pub use self::grouped_mesh::*;
pub use self::topology::{GroupIndex, MeshIndex, NumFaces, NumVertices, ObjectIndex};
pub use self::vertex_group::*;
