//! Module moves
//!
//! A [`Move`] describes one module pivoting about an edge it shares with an
//! anchor module, or sliding along the lattice. The pivot geometry (axis,
//! swept angle, and the translation that puts the pivot edge at the origin)
//! is reconstructed at construction from the anchor direction and the lattice
//! displacement alone.

use modbot_math::{mat3, mat4, Mat3, Mat4, ModuleShape, Vec3};

/// Identifier of a module, as written in scenario files
pub type ModuleId = u32;

/// How a module travels from its start cell to its end cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Rotation about an edge shared with the anchor module
    #[default]
    Pivot,
    /// Pure translation, no reorientation
    Sliding,
    /// Reserved; animated and committed like a slide
    Monkey,
}

/// Displacements with an L1 norm at or above this are outside the pivot domain
const DEGENERATE_L1: f32 = 2.5;

/// A single module move, immutable once built
///
/// `anchor_direction` is a unit vector (zero for generic slides) and
/// `delta_position` the whole-number lattice displacement of the mover.
/// For pivots the derived fields satisfy `post_translation == -pre_translation`.
#[derive(Clone, Debug, PartialEq)]
pub struct Move {
    mover_id: ModuleId,
    anchor_direction: Vec3,
    /// Anchor direction as given, kept when the pivot geometry zeroes it
    source_anchor: Vec3,
    delta_position: Vec3,
    kind: MoveKind,
    is_checkpoint: bool,
    shape: ModuleShape,

    rotation_axis: Vec3,
    max_angle: f32,
    pre_translation: Vec3,
    post_translation: Vec3,
}

impl Move {
    /// Build a move and derive its pivot geometry
    ///
    /// `anchor_direction` is normalized here. A pivot whose displacement has an
    /// L1 norm of 3 or more keeps a zero anchor direction, which leaves it
    /// without a usable rotation axis.
    pub fn new(
        mover_id: ModuleId,
        anchor_direction: Vec3,
        delta_position: Vec3,
        kind: MoveKind,
        is_checkpoint: bool,
        shape: ModuleShape,
    ) -> Self {
        let source_anchor = anchor_direction.normalized();
        let mut anchor_direction = source_anchor;
        let l1 = delta_position.l1();

        if kind == MoveKind::Pivot && l1 >= DEGENERATE_L1 {
            log::warn!(
                "Module {}: pivot displacement {:?} has L1 norm {} -- anchor treated as degenerate",
                mover_id, delta_position, l1
            );
            anchor_direction = Vec3::ZERO;
        }

        let mut mv = Self {
            mover_id,
            anchor_direction,
            source_anchor,
            delta_position,
            kind,
            is_checkpoint,
            shape,
            rotation_axis: Vec3::Y,
            max_angle: 0.0,
            pre_translation: Vec3::ZERO,
            post_translation: Vec3::ZERO,
        };

        if kind == MoveKind::Pivot {
            mv.derive_pivot_geometry();
        }

        mv
    }

    /// Reconstruct the pivot edge from the anchor direction and displacement.
    ///
    /// Derived from the observed face (L1 = 1) and corner (L1 = 2) moves;
    /// behaviour outside that domain is not defined.
    fn derive_pivot_geometry(&mut self) {
        let traits = self.shape.traits();
        let d = self.delta_position;

        self.rotation_axis = d.cross(self.anchor_direction).normalized();

        let start_pos = self.anchor_direction * self.shape.neighbor_distance();
        let linear_translation = start_pos + d;
        let translation_direction = linear_translation.normalized();

        self.post_translation = translation_direction * traits.midsphere_radius;
        self.pre_translation = -self.post_translation;

        self.max_angle = (d.l1() * traits.dihedral_angle_degrees).to_radians();
    }

    /// Id of the module this move acts on
    #[inline]
    pub fn mover_id(&self) -> ModuleId {
        self.mover_id
    }

    /// Unit direction used to locate the anchor (zero for generic slides)
    #[inline]
    pub fn anchor_direction(&self) -> Vec3 {
        self.anchor_direction
    }

    /// Anchor direction this move was built with, before degenerate pivots
    /// drop it. Serialization encodes from this.
    #[inline]
    pub fn source_anchor(&self) -> Vec3 {
        self.source_anchor
    }

    /// Lattice displacement of the mover
    #[inline]
    pub fn delta_position(&self) -> Vec3 {
        self.delta_position
    }

    #[inline]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Whether this move opens a checkpoint group
    #[inline]
    pub fn is_checkpoint(&self) -> bool {
        self.is_checkpoint
    }

    #[inline]
    pub fn shape(&self) -> ModuleShape {
        self.shape
    }

    /// Unit rotation axis (pivots only)
    #[inline]
    pub fn rotation_axis(&self) -> Vec3 {
        self.rotation_axis
    }

    /// Total angle swept by a pivot, in radians
    #[inline]
    pub fn max_angle(&self) -> f32 {
        self.max_angle
    }

    /// Translation applied before the pivot rotation
    #[inline]
    pub fn pre_translation(&self) -> Vec3 {
        self.pre_translation
    }

    /// Translation applied after the pivot rotation
    #[inline]
    pub fn post_translation(&self) -> Vec3 {
        self.post_translation
    }

    /// Return a copy with the checkpoint flag replaced
    pub fn with_checkpoint(mut self, is_checkpoint: bool) -> Self {
        self.is_checkpoint = is_checkpoint;
        self
    }

    /// The full rotation this move commits (identity for non-pivots)
    pub fn rotation_matrix(&self) -> Mat3 {
        match self.kind {
            MoveKind::Pivot => mat3::rotation_axis(self.rotation_axis, self.max_angle),
            MoveKind::Sliding | MoveKind::Monkey => mat3::IDENTITY,
        }
    }

    /// Offset of a sliding module at eased progress `t`
    ///
    /// Corner slides with an anchor move along the anchor's axes during the
    /// first half and along the remaining axes during the second half.
    pub fn slide_offset(&self, t: f32) -> Vec3 {
        let d = self.delta_position;
        let mask = self.anchor_direction.abs();

        if d.l1() > 1.0 && mask.sum() > 0.1 {
            let first_leg = (t * 2.0).min(1.0);
            let second_leg = (t * 2.0 - 1.0).max(0.0);
            let along_anchor = d.component_mul(mask);
            let across_anchor = d.component_mul(Vec3::ONE - mask);
            along_anchor * first_leg + across_anchor * second_leg
        } else {
            d * t
        }
    }

    /// Local transform of the mover at eased progress `t`, before its
    /// cumulative rotation is applied
    ///
    /// Pivots: translate by `pre_translation`, rotate by `max_angle * t`,
    /// translate by `post_translation`. Slides: translate by the slide offset.
    pub fn interpolated_transform(&self, t: f32) -> Mat4 {
        match self.kind {
            MoveKind::Pivot => {
                let pre = mat4::translation(self.pre_translation);
                let rotate = mat4::from_mat3(mat3::rotation_axis(self.rotation_axis, self.max_angle * t));
                let post = mat4::translation(self.post_translation);
                mat4::mul(post, mat4::mul(rotate, pre))
            }
            MoveKind::Sliding | MoveKind::Monkey => mat4::translation(self.slide_offset(t)),
        }
    }

    /// Build the move that undoes this one
    ///
    /// The displacement is negated. Face moves keep their anchor direction;
    /// corner moves recompute it from the mover's end cell, in the same
    /// anchor-centred frame the pivot geometry uses.
    pub fn reverse(&self) -> Move {
        let d = self.delta_position;

        let anchor_direction = if d.l1() <= 1.0 || self.anchor_direction == Vec3::ZERO {
            self.source_anchor
        } else {
            (self.anchor_direction * self.shape.neighbor_distance() - d).normalized()
        };

        Move::new(
            self.mover_id,
            anchor_direction,
            -d,
            self.kind,
            self.is_checkpoint,
            self.shape,
        )
    }
}
