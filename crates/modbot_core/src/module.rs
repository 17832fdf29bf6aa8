//! Module pose state
//!
//! A [`Module`] is one lattice-aligned solid. It keeps two transforms apart:
//! the committed pose (`base_position` + `cumulative_rotation`), which only
//! changes when a move finishes, and the local transform handed to the
//! renderer, which is rebuilt every animation frame.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use modbot_math::{ease_in_out_sine, mat3, mat4, Mat3, Mat4, ModuleShape, Vec3};
use serde::{Serialize, Deserialize};

use crate::moves::{ModuleId, Move, MoveKind};

/// Entries this close to -1, 0 or 1 are snapped when a rotation is committed
const SNAP_EPSILON: f32 = 1e-4;

bitflags! {
    /// Which parts of a module changed since the renderer last read it
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Local (animated) transform changed
        const TRANSFORM = 1 << 0;
        /// Committed lattice position changed
        const POSITION = 1 << 1;
        /// Color or scale changed
        const MATERIAL = 1 << 2;
        /// Everything, used for new modules
        const ALL = Self::TRANSFORM.bits() | Self::POSITION.bits() | Self::MATERIAL.bits();
    }
}

/// 8-bit RGB color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GRAY: Self = Self { r: 0x80, g: 0x80, b: 0x80 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized opaque RGBA
    pub fn to_rgba(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

/// Per-module data in the layout an instance buffer expects
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ModuleInstance {
    /// World matrix, column-major
    pub model: [[f32; 4]; 4],
    /// RGBA color
    pub color: [f32; 4],
}

/// A single module and its pose
#[derive(Clone, Debug)]
pub struct Module {
    /// Scenario id
    pub id: ModuleId,
    /// Shape of the module
    pub shape: ModuleShape,
    base_position: Vec3,
    cumulative_rotation: Mat3,
    color: Color,
    scale: f32,
    local_transform: Mat4,
    dirty: DirtyFlags,
}

impl Module {
    /// Create a module at rest at `base_position` with identity orientation
    pub fn new(id: ModuleId, shape: ModuleShape, base_position: Vec3, color: Color, scale: f32) -> Self {
        Self {
            id,
            shape,
            base_position,
            cumulative_rotation: mat3::IDENTITY,
            color,
            scale,
            local_transform: mat4::scale(scale),
            dirty: DirtyFlags::ALL,
        }
    }

    /// Committed lattice position
    #[inline]
    pub fn base_position(&self) -> Vec3 {
        self.base_position
    }

    /// Committed position rounded to integer lattice coordinates
    #[inline]
    pub fn lattice_position(&self) -> [i32; 3] {
        self.base_position.to_lattice()
    }

    /// Product of every committed pivot rotation
    #[inline]
    pub fn cumulative_rotation(&self) -> Mat3 {
        self.cumulative_rotation
    }

    /// Mesh transform relative to `base_position`, including any in-progress move
    #[inline]
    pub fn local_transform(&self) -> Mat4 {
        self.local_transform
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Change color and scale, keeping the pose
    pub fn set_appearance(&mut self, color: Color, scale: f32) {
        self.color = color;
        self.scale = scale;
        self.reset_local_transform();
        self.mark_dirty(DirtyFlags::MATERIAL | DirtyFlags::TRANSFORM);
    }

    /// Show `mv` at progress `pct` (clamped to `[0, 1]`, eased before use)
    ///
    /// Only the local transform changes; the committed pose is untouched.
    pub fn animate(&mut self, mv: &Move, pct: f32) {
        let t = ease_in_out_sine(pct.clamp(0.0, 1.0));
        let rest = mat4::mul(mat4::from_mat3(self.cumulative_rotation), mat4::scale(self.scale));
        self.local_transform = mat4::mul(mv.interpolated_transform(t), rest);
        self.mark_dirty(DirtyFlags::TRANSFORM);
    }

    /// Commit `mv` to the pose
    ///
    /// Pivots left-multiply the cumulative rotation by the full move rotation;
    /// every move adds its displacement to the base position.
    pub fn finish(&mut self, mv: &Move) {
        if mv.kind() == MoveKind::Pivot {
            let rotated = mat3::mul(mv.rotation_matrix(), self.cumulative_rotation);
            self.cumulative_rotation = mat3::snap(rotated, SNAP_EPSILON);
        }
        self.base_position += mv.delta_position();
        self.reset_local_transform();
        self.mark_dirty(DirtyFlags::TRANSFORM | DirtyFlags::POSITION);
    }

    fn reset_local_transform(&mut self) {
        self.local_transform = mat4::mul(mat4::from_mat3(self.cumulative_rotation), mat4::scale(self.scale));
    }

    /// `T(base_position) * local_transform`
    pub fn world_matrix(&self) -> Mat4 {
        mat4::mul(mat4::translation(self.base_position), self.local_transform)
    }

    /// Render-ready instance data
    pub fn instance(&self) -> ModuleInstance {
        ModuleInstance {
            model: self.world_matrix(),
            color: self.color.to_rgba(),
        }
    }

    // --- Dirty tracking ---

    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}
