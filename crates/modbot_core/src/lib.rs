//! Move planning and playback for modular robots
//!
//! This crate turns scenario descriptions into module poses and animates them:
//!
//! - [`Move`] - one module pivoting about an edge of its anchor, or sliding
//! - [`anchor`] - the integer anchor codes used by scenario files
//! - [`Module`] - committed pose plus the animated transform for rendering
//! - [`ModuleRegistry`] - all modules of a scenario, keyed by id
//! - [`MoveSequence`] - reversible move queue with undo
//! - [`PlaybackController`] - checkpoint-aware frame-by-frame playback
//! - [`Session`] - registry, sequence and playback with atomic scenario swaps
//! - [`Scenario`] - text parser and serializer
//! - [`ScenarioLoader`] - background loading on a worker thread
//! - [`export`] - lattice position exports

pub mod anchor;
mod moves;
mod module;
mod registry;
mod sequence;
mod playback;
mod session;
mod scenario;
mod scenario_loader;
mod error;
pub mod export;

pub use moves::{ModuleId, Move, MoveKind};
pub use module::{Color, DirtyFlags, Module, ModuleInstance};
pub use registry::ModuleRegistry;
pub use sequence::MoveSequence;
pub use playback::{Direction, PlaybackController, PlaybackEvent};
pub use session::Session;
pub use scenario::{ModuleDef, Scenario, Visgroup};
pub use scenario_loader::{LoadResult, ScenarioLoader};
pub use error::{ExportError, ScenarioError};

// Re-export the math types callers need alongside the core types
pub use modbot_math::{Mat3, Mat4, ModuleShape, ShapeTraits, Vec3};
