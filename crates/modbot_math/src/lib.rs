//! Module robot mathematics
//!
//! This crate provides the vector, matrix and shape types the move planner and
//! the rendering collaborator share.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat3`] - column-major 3x3 rotation matrix
//! - [`Mat4`] - column-major 4x4 affine matrix for render transforms
//!
//! ## Shape Types
//!
//! - [`ModuleShape`] - cube or rhombic dodecahedron
//! - [`ShapeTraits`] - per-shape geometric constants and unit mesh

mod vec3;
pub mod mat3;
pub mod mat4;
pub mod ease;
pub mod shape;

pub use vec3::Vec3;
pub use mat3::Mat3;
pub use mat4::Mat4;
pub use ease::ease_in_out_sine;
pub use shape::{ModuleShape, ShapeTraits, UnknownShape};
