//! Anchor direction codes
//!
//! Scenario files describe the anchor of a move with a small integer. The sign
//! selects the move kind (positive pivots, zero or negative slides) and the
//! magnitude indexes a fixed table of directions: single digits are the six
//! cube face normals, two-digit codes are the twelve rhombic dodecahedron face
//! normals, spelled as a pair of axis digits (`1`=+x, `2`=+y, `3`=+z,
//! `4`=-x, `5`=-y, `6`=-z).

use modbot_math::Vec3;

use crate::moves::MoveKind;

const MATCH_EPSILON: f32 = 1e-4;

/// `(code, direction)` for every non-zero code. Directions are not normalized.
const ANCHOR_TABLE: [(i32, [i8; 3]); 18] = [
    (1, [1, 0, 0]),
    (2, [0, 1, 0]),
    (3, [0, 0, 1]),
    (4, [-1, 0, 0]),
    (5, [0, -1, 0]),
    (6, [0, 0, -1]),
    // xy plane
    (12, [1, 1, 0]),
    (15, [1, -1, 0]),
    (42, [-1, 1, 0]),
    (45, [-1, -1, 0]),
    // xz plane
    (13, [1, 0, 1]),
    (16, [1, 0, -1]),
    (43, [-1, 0, 1]),
    (46, [-1, 0, -1]),
    // yz plane
    (23, [0, 1, 1]),
    (26, [0, 1, -1]),
    (53, [0, -1, 1]),
    (56, [0, -1, -1]),
];

fn table_direction(entry: [i8; 3]) -> Vec3 {
    Vec3::new(entry[0] as f32, entry[1] as f32, entry[2] as f32).normalized()
}

/// Look up the unit anchor direction for `abs(code)`
///
/// Returns `None` for codes outside the table. Code 0 is the zero vector.
pub fn direction(code: i32) -> Option<Vec3> {
    let magnitude = code.checked_abs()?;
    if magnitude == 0 {
        return Some(Vec3::ZERO);
    }
    ANCHOR_TABLE
        .iter()
        .find(|(c, _)| *c == magnitude)
        .map(|(_, entry)| table_direction(*entry))
}

/// Decode a scenario anchor code into a unit direction and move kind
///
/// Unknown codes degrade to a sliding move with no anchor.
pub fn decode(code: i32) -> (Vec3, MoveKind) {
    match direction(code) {
        Some(dir) => {
            let kind = if code > 0 { MoveKind::Pivot } else { MoveKind::Sliding };
            (dir, kind)
        }
        None => {
            log::warn!("Unknown anchor code {} -- treating as sliding move", code);
            (Vec3::ZERO, MoveKind::Sliding)
        }
    }
}

/// Encode an anchor direction and move kind back into a scenario code
///
/// Directions that are not in the table encode as 0 (a generic slide).
pub fn encode(anchor_direction: Vec3, kind: MoveKind) -> i32 {
    if anchor_direction.approx_eq(Vec3::ZERO, MATCH_EPSILON) {
        if kind == MoveKind::Pivot {
            log::warn!("Pivot move without an anchor direction encodes as a generic slide");
        }
        return 0;
    }

    let unit = anchor_direction.normalized();
    let code = ANCHOR_TABLE
        .iter()
        .find(|(_, entry)| table_direction(*entry).approx_eq(unit, MATCH_EPSILON))
        .map(|(code, _)| *code);

    match (code, kind) {
        (Some(code), MoveKind::Pivot) => code,
        (Some(code), _) => -code,
        (None, _) => {
            log::warn!("Anchor direction {:?} has no code -- encoding as generic slide", unit);
            0
        }
    }
}
