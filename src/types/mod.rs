//! Core value types shared by the document model, geometry and queries

pub mod bounds;
pub mod color;
pub mod handle;
pub mod line_weight;
pub mod vector;
pub mod version;

pub use bounds::BoundingBox2D;
pub use color::{aci_to_rgb, Color};
pub use handle::Handle;
pub use line_weight::LineWeight;
pub use vector::{Vector2, Vector3};
pub use version::DxfVersion;
