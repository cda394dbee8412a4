pub mod cube;
pub mod error;
pub mod field;
pub mod interp;
pub mod march;
pub mod mesh;
pub mod plugin;
pub mod tables;
pub mod types;
pub mod volume;

pub use field::ScalarField;
pub use interp::VertexPlacement;
pub use march::{triangulate, triangulate_with};
pub use plugin::IsosurfacePlugin;
pub use volume::Volume;
