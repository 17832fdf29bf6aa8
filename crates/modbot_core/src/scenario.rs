//! Scenario files
//!
//! A scenario is plain text:
//!
//! ```text
//! Name
//! Description
//! CUBE
//!
//! // visgroups: id, r, g, b, scale percent
//! 0, 255, 0, 0, 100
//!
//! // modules: id, visgroup, x, y, z
//! 0, 0, 0, 0, 0
//! 1, 0, 0, -1, 0
//!
//! // moves: mover, anchor code, dx, dy, dz
//! 0, 5, 1, 0, 0
//!
//! 0, 5, -1, 0, 0
//! ```
//!
//! The header runs up to the first blank line. After it, blank lines separate
//! the visgroup block, the module block and any number of move blocks; the
//! first move of each move block is a checkpoint. `//` starts a comment and
//! whitespace inside a line is ignored.
//!
//! A run of blank lines counts as a single separator, so blocks cannot be
//! empty: a scenario without modules simply ends after its visgroups, and
//! two blank lines never skip the module block.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use modbot_math::{ModuleShape, Vec3};

use crate::anchor;
use crate::error::ScenarioError;
use crate::module::{Color, Module};
use crate::moves::{ModuleId, Move};
use crate::registry::ModuleRegistry;
use crate::sequence::MoveSequence;

/// Color and scale shared by a group of modules
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visgroup {
    pub id: u32,
    pub color: Color,
    /// Size relative to the unit module, in percent
    pub scale_percent: u32,
}

impl Visgroup {
    /// Scale factor for the module mesh
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale_percent as f32 / 100.0
    }
}

/// Initial placement of one module
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModuleDef {
    pub id: ModuleId,
    pub visgroup: u32,
    pub position: [i32; 3],
}

/// A parsed scenario: modules plus the moves that reconfigure them
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub shape: ModuleShape,
    pub visgroups: BTreeMap<u32, Visgroup>,
    /// Modules in file order
    pub modules: Vec<ModuleDef>,
    /// Moves in playback order, checkpoints already flagged
    pub moves: Vec<Move>,
}

impl Scenario {
    /// Create an empty scenario
    pub fn new(name: impl Into<String>, description: impl Into<String>, shape: ModuleShape) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            shape,
            visgroups: BTreeMap::new(),
            modules: Vec::new(),
            moves: Vec::new(),
        }
    }

    /// Read and parse a scenario file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ScenarioError::from(e).in_file(path))?;
        let scenario = Self::parse(&text).map_err(|e| e.in_file(path))?;
        log::info!(
            "Loaded scenario '{}' from {}: {} modules, {} moves",
            scenario.name,
            path.display(),
            scenario.modules.len(),
            scenario.moves.len()
        );
        Ok(scenario)
    }

    /// Write the scenario in text form
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ScenarioError> {
        fs::write(path, self.to_scen())?;
        Ok(())
    }

    /// Parse scenario text
    pub fn parse(text: &str) -> Result<Self, ScenarioError> {
        let text = text.replace('\r', "");
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

        let mut header = Vec::new();
        for (_, line) in lines.by_ref() {
            if line.trim().is_empty() {
                break;
            }
            header.push(line.trim());
        }

        let name = header.first().copied().unwrap_or_default();
        let description = header.get(1).copied().unwrap_or_default();
        let shape = match header.get(2) {
            Some(keyword) => keyword.parse().unwrap_or_else(|e| {
                log::warn!("{} -- defaulting to CUBE", e);
                ModuleShape::Cube
            }),
            None => {
                log::warn!("Scenario header has no module shape -- defaulting to CUBE");
                ModuleShape::Cube
            }
        };

        let mut scenario = Scenario::new(name, description, shape);
        let mut block = 0usize;
        let mut after_blank = true;
        let mut checkpoint = true;

        for (line_no, raw) in lines {
            let content: String = raw
                .split("//")
                .next()
                .unwrap_or("")
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();

            if content.is_empty() {
                // Comment-only lines do not end a block
                if raw.trim().is_empty() && !after_blank {
                    block += 1;
                    checkpoint = true;
                    after_blank = true;
                }
                continue;
            }
            after_blank = false;

            let fields = parse_fields(line_no, &content)?;
            match block {
                0 => scenario.parse_visgroup(line_no, fields)?,
                1 => scenario.parse_module(line_no, fields)?,
                _ => {
                    scenario.parse_move(line_no, fields, checkpoint)?;
                    checkpoint = false;
                }
            }
        }

        Ok(scenario)
    }

    fn parse_visgroup(&mut self, line_no: usize, fields: [i32; 5]) -> Result<(), ScenarioError> {
        let [id, r, g, b, scale] = fields;
        let visgroup = Visgroup {
            id: non_negative(line_no, "visgroup id", id)?,
            color: Color::new(
                channel(line_no, "red", r)?,
                channel(line_no, "green", g)?,
                channel(line_no, "blue", b)?,
            ),
            scale_percent: non_negative(line_no, "scale", scale)?,
        };
        if self.visgroups.insert(visgroup.id, visgroup).is_some() {
            log::warn!("Line {}: visgroup {} redefined", line_no, visgroup.id);
        }
        Ok(())
    }

    fn parse_module(&mut self, line_no: usize, fields: [i32; 5]) -> Result<(), ScenarioError> {
        let [id, visgroup, x, y, z] = fields;
        let id = non_negative(line_no, "module id", id)?;
        let visgroup = non_negative(line_no, "visgroup id", visgroup)?;

        if !self.visgroups.contains_key(&visgroup) {
            return Err(ScenarioError::UnknownVisgroup { line: line_no, visgroup });
        }
        if self.modules.iter().any(|m| m.id == id) {
            return Err(ScenarioError::DuplicateModule { line: line_no, id });
        }

        self.modules.push(ModuleDef { id, visgroup, position: [x, y, z] });
        Ok(())
    }

    fn parse_move(&mut self, line_no: usize, fields: [i32; 5], checkpoint: bool) -> Result<(), ScenarioError> {
        let [mover, code, dx, dy, dz] = fields;
        let mover = non_negative(line_no, "mover id", mover)?;
        if !self.modules.iter().any(|m| m.id == mover) {
            log::warn!("Line {}: move references undefined module {}", line_no, mover);
        }

        let (anchor_direction, kind) = anchor::decode(code);
        let delta = Vec3::from_lattice([dx, dy, dz]);
        self.moves.push(Move::new(mover, anchor_direction, delta, kind, checkpoint, self.shape));
        Ok(())
    }

    /// Serialize back to scenario text
    ///
    /// Each checkpoint move starts a new move block. The name and description
    /// must not be empty, since a blank line ends the header.
    pub fn to_scen(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(out, "{}", self.name);
        let _ = writeln!(out, "{}", self.description);
        let _ = writeln!(out, "{}", self.shape.keyword());
        out.push('\n');

        for vg in self.visgroups.values() {
            let _ = writeln!(
                out,
                "{}, {}, {}, {}, {}",
                vg.id, vg.color.r, vg.color.g, vg.color.b, vg.scale_percent
            );
        }
        out.push('\n');

        for m in &self.modules {
            let [x, y, z] = m.position;
            let _ = writeln!(out, "{}, {}, {}, {}, {}", m.id, m.visgroup, x, y, z);
        }

        for (i, mv) in self.moves.iter().enumerate() {
            if i == 0 || mv.is_checkpoint() {
                out.push('\n');
            }
            let code = anchor::encode(mv.source_anchor(), mv.kind());
            let [dx, dy, dz] = mv.delta_position().to_lattice();
            let _ = writeln!(out, "{}, {}, {}, {}, {}", mv.mover_id(), code, dx, dy, dz);
        }

        out
    }

    /// Create the modules at their initial positions
    pub fn build_modules(&self) -> ModuleRegistry {
        self.modules
            .iter()
            .map(|def| {
                let (color, scale) = match self.visgroups.get(&def.visgroup) {
                    Some(vg) => (vg.color, vg.scale()),
                    None => {
                        log::warn!("Module {} uses undefined visgroup {}", def.id, def.visgroup);
                        (Color::GRAY, 1.0)
                    }
                };
                Module::new(def.id, self.shape, Vec3::from_lattice(def.position), color, scale)
            })
            .collect()
    }

    /// A fresh sequence over the scenario's moves
    pub fn move_sequence(&self) -> MoveSequence {
        MoveSequence::new(self.moves.clone())
    }

    /// This scenario's header and visgroups with the modules placed where
    /// `registry` has them now, and no moves
    pub fn snapshot(&self, registry: &ModuleRegistry) -> Scenario {
        let fallback_visgroup = self.visgroups.keys().next().copied().unwrap_or_default();
        let modules = registry
            .iter()
            .map(|module| {
                let visgroup = self
                    .modules
                    .iter()
                    .find(|def| def.id == module.id)
                    .map_or(fallback_visgroup, |def| def.visgroup);
                ModuleDef { id: module.id, visgroup, position: module.lattice_position() }
            })
            .collect();

        Scenario {
            name: self.name.clone(),
            description: self.description.clone(),
            shape: self.shape,
            visgroups: self.visgroups.clone(),
            modules,
            moves: Vec::new(),
        }
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_fields(line_no: usize, content: &str) -> Result<[i32; 5], ScenarioError> {
    let parts: Vec<&str> = content.split(',').collect();
    if parts.len() != 5 {
        return Err(ScenarioError::parse(
            line_no,
            format!("expected 5 comma-separated values, found {}", parts.len()),
        ));
    }

    let mut values = [0i32; 5];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse()
            .map_err(|_| ScenarioError::parse(line_no, format!("invalid integer '{}'", part)))?;
    }
    Ok(values)
}

fn non_negative(line_no: usize, what: &str, value: i32) -> Result<u32, ScenarioError> {
    u32::try_from(value).map_err(|_| ScenarioError::parse(line_no, format!("{} must not be negative, got {}", what, value)))
}

fn channel(line_no: usize, what: &str, value: i32) -> Result<u8, ScenarioError> {
    u8::try_from(value).map_err(|_| ScenarioError::parse(line_no, format!("{} channel must be 0-255, got {}", what, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveKind;

    const EPSILON: f32 = 0.0001;

    const MINIMAL: &str = "Minimal\nOne cube, one move\nCUBE\n\n0,255,0,0,100\n\n0,0,0,0,0\n\n0,1,1,0,0\n";

    const GROUPED: &str = "\
Grouped
Two groups of moves
CUBE

0, 255, 0, 0, 100
1, 0, 0, 255, 90

0, 0, 0, 0, 0
1, 1, 0, -1, 0   // anchor

// first group
0, 5, 1, 0, 0
0, 5, -1, 0, 0

0, 5, 1, 0, 0
";

    #[test]
    fn test_minimal_scenario() {
        let scenario = Scenario::parse(MINIMAL).unwrap();
        assert_eq!(scenario.name, "Minimal");
        assert_eq!(scenario.description, "One cube, one move");
        assert_eq!(scenario.shape, ModuleShape::Cube);
        assert_eq!(scenario.modules, vec![ModuleDef { id: 0, visgroup: 0, position: [0, 0, 0] }]);

        assert_eq!(scenario.moves.len(), 1);
        let mv = &scenario.moves[0];
        assert_eq!(mv.kind(), MoveKind::Pivot);
        assert_eq!(mv.anchor_direction(), Vec3::X);
        assert_eq!(mv.delta_position(), Vec3::X);
        assert!(mv.is_checkpoint());

        let registry = scenario.build_modules();
        assert_eq!(registry.len(), 1);
        let module = registry.get(0).unwrap();
        assert_eq!(module.lattice_position(), [0, 0, 0]);
        assert_eq!(module.color(), Color::new(255, 0, 0));
        assert!((module.scale() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_checkpoint_blocks() {
        let scenario = Scenario::parse(GROUPED).unwrap();
        let flags: Vec<bool> = scenario.moves.iter().map(Move::is_checkpoint).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_comments_and_spaces_are_ignored() {
        let scenario = Scenario::parse(GROUPED).unwrap();
        assert_eq!(scenario.visgroups.len(), 2);
        assert_eq!(scenario.modules[1].position, [0, -1, 0]);
        assert!((scenario.visgroups[&1].scale() - 0.9).abs() < EPSILON);
    }

    #[test]
    fn test_crlf_and_repeated_blank_lines() {
        let text = "Name\r\nDesc\r\nRHOMBIC_DODECAHEDRON\r\n\r\n\r\n0,1,2,3,100\r\n\r\n\r\n0,0,1,1,0\r\n\r\n0,-45,0,-1,1\r\n";
        let scenario = Scenario::parse(text).unwrap();
        assert_eq!(scenario.shape, ModuleShape::RhombicDodecahedron);
        assert_eq!(scenario.visgroups[&0].color, Color::new(1, 2, 3));
        assert_eq!(scenario.modules[0].position, [1, 1, 0]);
        assert_eq!(scenario.moves[0].kind(), MoveKind::Sliding);
        assert_eq!(scenario.moves[0].shape(), ModuleShape::RhombicDodecahedron);
    }

    #[test]
    fn test_unknown_shape_defaults_to_cube() {
        let scenario = Scenario::parse("Name\nDesc\nHEXAGON\n\n0,1,1,1,100\n").unwrap();
        assert_eq!(scenario.shape, ModuleShape::Cube);

        let scenario = Scenario::parse("Name only\n").unwrap();
        assert_eq!(scenario.shape, ModuleShape::Cube);
        assert!(scenario.modules.is_empty());
    }

    #[test]
    fn test_unknown_anchor_code_is_slide() {
        let text = MINIMAL.replace("0,1,1,0,0", "0,99,1,0,0");
        let scenario = Scenario::parse(&text).unwrap();
        assert_eq!(scenario.moves[0].kind(), MoveKind::Sliding);
        assert_eq!(scenario.moves[0].anchor_direction(), Vec3::ZERO);
    }

    #[test]
    fn test_wrong_field_count_is_error() {
        let text = MINIMAL.replace("0,0,0,0,0", "0,0,0,0");
        match Scenario::parse(&text) {
            Err(ScenarioError::Parse { line, .. }) => assert_eq!(line, 7),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_integer_is_error() {
        let text = MINIMAL.replace("0,1,1,0,0", "0,1,x,0,0");
        let err = Scenario::parse(&text).unwrap_err();
        assert!(err.to_string().contains("'x'"), "{}", err);
    }

    #[test]
    fn test_color_out_of_range_is_error() {
        let text = MINIMAL.replace("0,255,0,0,100", "0,256,0,0,100");
        assert!(matches!(Scenario::parse(&text), Err(ScenarioError::Parse { line: 5, .. })));
    }

    #[test]
    fn test_unknown_visgroup_is_error() {
        let text = MINIMAL.replace("0,0,0,0,0", "0,3,0,0,0");
        assert!(matches!(
            Scenario::parse(&text),
            Err(ScenarioError::UnknownVisgroup { line: 7, visgroup: 3 })
        ));
    }

    #[test]
    fn test_duplicate_module_is_error() {
        let text = MINIMAL.replace("0,0,0,0,0", "0,0,0,0,0\n0,0,1,0,0");
        assert!(matches!(
            Scenario::parse(&text),
            Err(ScenarioError::DuplicateModule { line: 8, id: 0 })
        ));
    }

    #[test]
    fn test_round_trip() {
        let scenario = Scenario::parse(GROUPED).unwrap();
        let text = scenario.to_scen();
        let reparsed = Scenario::parse(&text).unwrap();
        assert_eq!(reparsed, scenario);
    }

    #[test]
    fn test_round_trip_rd_corner_moves() {
        let text = "RD\nCorner moves\nRHOMBIC_DODECAHEDRON\n\n0,10,20,30,95\n\n0,0,0,0,0\n1,0,-1,-1,0\n\n0,45,0,-1,1\n0,-12,1,1,0\n\n1,0,1,0,0\n";
        let scenario = Scenario::parse(text).unwrap();
        let reparsed = Scenario::parse(&scenario.to_scen()).unwrap();
        assert_eq!(reparsed.moves.len(), 3);
        for (a, b) in scenario.moves.iter().zip(&reparsed.moves) {
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.is_checkpoint(), b.is_checkpoint());
            assert_eq!(a.delta_position(), b.delta_position());
            assert!(a.anchor_direction().approx_eq(b.anchor_direction(), EPSILON));
        }
    }

    #[test]
    fn test_round_trip_out_of_domain_pivot() {
        let text = MINIMAL.replace("0,1,1,0,0", "0,1,2,1,0");
        let scenario = Scenario::parse(&text).unwrap();
        assert_eq!(scenario.moves[0].kind(), MoveKind::Pivot);
        assert_eq!(scenario.moves[0].anchor_direction(), Vec3::ZERO);

        let serialized = scenario.to_scen();
        assert!(serialized.contains("0, 1, 2, 1, 0"), "{}", serialized);

        let reparsed = Scenario::parse(&serialized).unwrap();
        assert_eq!(reparsed.moves[0].kind(), MoveKind::Pivot);
        assert_eq!(reparsed.moves[0].source_anchor(), Vec3::X);
        assert_eq!(reparsed, scenario);
    }

    #[test]
    fn test_blank_line_runs_never_skip_a_block() {
        let text = "Name\nDesc\nCUBE\n\n0,1,1,1,100\n\n\n0,0,4,0,0\n";
        let scenario = Scenario::parse(text).unwrap();
        assert_eq!(scenario.modules.len(), 1);
        assert_eq!(scenario.modules[0].position, [4, 0, 0]);
        assert!(scenario.moves.is_empty());
    }

    #[test]
    fn test_snapshot_uses_current_positions() {
        let scenario = Scenario::parse(GROUPED).unwrap();
        let mut registry = scenario.build_modules();
        let mut sequence = scenario.move_sequence();
        let mv = sequence.pop().unwrap();
        registry.finish(&mv);

        let snapshot = scenario.snapshot(&registry);
        assert!(snapshot.moves.is_empty());
        assert_eq!(snapshot.modules[0], ModuleDef { id: 0, visgroup: 0, position: [1, 0, 0] });
        assert_eq!(snapshot.modules[1], ModuleDef { id: 1, visgroup: 1, position: [0, -1, 0] });

        let reparsed = Scenario::parse(&snapshot.to_scen()).unwrap();
        assert_eq!(reparsed.modules, snapshot.modules);
    }

    #[test]
    fn test_from_str() {
        let scenario: Scenario = MINIMAL.parse().unwrap();
        assert_eq!(scenario.move_sequence().total(), 1);
    }
}
