//! Module shapes and their geometric constants
//!
//! Every per-shape fact (dihedral angle, insphere and midsphere radii, unit
//! mesh) lives in one [`ShapeTraits`] table keyed by [`ModuleShape`], so the
//! move geometry and the rendering collaborator never switch on the shape
//! themselves.

use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::Vec3;

/// The polyhedron a module is built from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleShape {
    /// Unit cube on the simple cubic lattice
    #[default]
    Cube,
    /// Rhombic dodecahedron on the face-centred cubic lattice
    RhombicDodecahedron,
}

/// Geometric constants of a module shape at unit scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeTraits {
    /// Rotation swept per unit of lattice displacement, in degrees
    pub dihedral_angle_degrees: f32,
    /// Distance from the centre to a face
    pub inscribed_sphere_radius: f32,
    /// Distance from the centre to an edge (pivot point radius)
    pub midsphere_radius: f32,
    /// Unit mesh vertices, centred on the origin
    pub vertices: &'static [Vec3],
    /// Triangle indices into `vertices`, counter-clockwise seen from outside
    pub triangles: &'static [[u16; 3]],
}

// Vertex order shared by both meshes: the eight cube corners A..H first.
const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5), // A
    Vec3::new(-0.5, -0.5,  0.5), // B
    Vec3::new( 0.5, -0.5,  0.5), // C
    Vec3::new( 0.5, -0.5, -0.5), // D
    Vec3::new(-0.5,  0.5, -0.5), // E
    Vec3::new(-0.5,  0.5,  0.5), // F
    Vec3::new( 0.5,  0.5,  0.5), // G
    Vec3::new( 0.5,  0.5, -0.5), // H
];

const CUBE_TRIANGLES: [[u16; 3]; 12] = [
    [5, 6, 7], [5, 7, 4], // +y
    [0, 3, 2], [0, 2, 1], // -y
    [2, 3, 7], [2, 7, 6], // +x
    [0, 1, 5], [0, 5, 4], // -x
    [1, 2, 6], [1, 6, 5], // +z
    [0, 4, 7], [0, 7, 3], // -z
];

const RD_VERTICES: [Vec3; 14] = [
    // Obtuse vertices (the inner cube)
    Vec3::new(-0.5, -0.5, -0.5), //  0 A
    Vec3::new(-0.5, -0.5,  0.5), //  1 B
    Vec3::new( 0.5, -0.5,  0.5), //  2 C
    Vec3::new( 0.5, -0.5, -0.5), //  3 D
    Vec3::new(-0.5,  0.5, -0.5), //  4 E
    Vec3::new(-0.5,  0.5,  0.5), //  5 F
    Vec3::new( 0.5,  0.5,  0.5), //  6 G
    Vec3::new( 0.5,  0.5, -0.5), //  7 H
    // Acute vertices (pyramid tips)
    Vec3::new( 0.0,  0.0,  1.0), //  8 J
    Vec3::new(-1.0,  0.0,  0.0), //  9 K
    Vec3::new( 1.0,  0.0,  0.0), // 10 L
    Vec3::new( 0.0, -1.0,  0.0), // 11 M
    Vec3::new( 0.0,  1.0,  0.0), // 12 N
    Vec3::new( 0.0,  0.0, -1.0), // 13 O
];

// Each rhombus is split into two triangles.
const RD_TRIANGLES: [[u16; 3]; 24] = [
    [12, 4, 5], [5, 4, 9],    // NEKF
    [12, 5, 6], [6, 5, 8],    // NFJG
    [12, 6, 7], [7, 6, 10],   // NGLH
    [12, 7, 4], [4, 7, 13],   // NHOE
    [11, 1, 0], [0, 1, 9],    // MAKB
    [11, 2, 1], [1, 2, 8],    // MBJC
    [11, 3, 2], [2, 3, 10],   // MCLD
    [11, 0, 3], [3, 0, 13],   // MDOA
    [5, 9, 8], [8, 9, 1],     // FKBJ
    [6, 8, 10], [10, 8, 2],   // GJCL
    [7, 10, 13], [13, 10, 3], // HLDO
    [4, 13, 9], [9, 13, 0],   // EKAO
];

static CUBE_TRAITS: ShapeTraits = ShapeTraits {
    dihedral_angle_degrees: 90.0,
    inscribed_sphere_radius: 0.5,
    midsphere_radius: 0.7071,
    vertices: &CUBE_VERTICES,
    triangles: &CUBE_TRIANGLES,
};

static RD_TRAITS: ShapeTraits = ShapeTraits {
    dihedral_angle_degrees: 60.0,
    inscribed_sphere_radius: 0.7071,
    midsphere_radius: 0.8165,
    vertices: &RD_VERTICES,
    triangles: &RD_TRIANGLES,
};

impl ModuleShape {
    /// All supported shapes
    pub const ALL: [ModuleShape; 2] = [ModuleShape::Cube, ModuleShape::RhombicDodecahedron];

    /// The geometric constants for this shape
    #[inline]
    pub fn traits(self) -> &'static ShapeTraits {
        match self {
            ModuleShape::Cube => &CUBE_TRAITS,
            ModuleShape::RhombicDodecahedron => &RD_TRAITS,
        }
    }

    /// Distance between the centres of two face-adjacent modules
    #[inline]
    pub fn neighbor_distance(self) -> f32 {
        2.0 * self.traits().inscribed_sphere_radius
    }

    /// Keyword used in scenario headers
    pub fn keyword(self) -> &'static str {
        match self {
            ModuleShape::Cube => "CUBE",
            ModuleShape::RhombicDodecahedron => "RHOMBIC_DODECAHEDRON",
        }
    }
}

impl fmt::Display for ModuleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Error for an unrecognised shape keyword
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownShape(pub String);

impl fmt::Display for UnknownShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown module shape '{}'", self.0)
    }
}

impl std::error::Error for UnknownShape {}

impl FromStr for ModuleShape {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CUBE" => Ok(ModuleShape::Cube),
            "RHOMBIC_DODECAHEDRON" => Ok(ModuleShape::RhombicDodecahedron),
            other => Err(UnknownShape(other.to_string())),
        }
    }
}
