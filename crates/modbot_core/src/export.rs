//! Lattice exports
//!
//! Serializations of the modules' committed lattice positions, in id order:
//! - a plain `x,y,z` dump,
//! - the JSON module list the pathfinder reads (`order`, `axisSize`, `modules`),
//! - a fixed-column table with a constant header line.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::error::ExportError;
use crate::registry::ModuleRegistry;

/// Header of the fixed-column table
pub const POSITIONAL_HEADER: &str = "MODULE      X      Y      Z";

/// Lattice dimensionality written to the JSON export
pub const LATTICE_ORDER: u32 = 3;

/// JSON lattice description
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatticeFile {
    pub order: u32,
    /// Edge length of the cubic region holding every module
    pub axis_size: i32,
    pub modules: Vec<LatticeModule>,
}

/// One module in the JSON export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatticeModule {
    pub position: [i32; 3],
    #[serde(rename = "static")]
    pub is_static: bool,
}

impl LatticeFile {
    /// Describe the modules of `registry`
    ///
    /// Every module is marked static. `axis_size` is the largest coordinate
    /// plus one (at least 1), saturating at `i32::MAX`.
    pub fn from_registry(registry: &ModuleRegistry) -> Self {
        let modules: Vec<LatticeModule> = registry
            .iter()
            .map(|m| LatticeModule { position: m.lattice_position(), is_static: true })
            .collect();
        let max_coord = modules
            .iter()
            .flat_map(|m| m.position)
            .max()
            .unwrap_or(0)
            .max(0);

        Self {
            order: LATTICE_ORDER,
            axis_size: max_coord.saturating_add(1),
            modules,
        }
    }
}

/// One `x,y,z` line per module
pub fn lattice_dump(registry: &ModuleRegistry) -> String {
    let mut out = String::new();
    for module in registry.iter() {
        let [x, y, z] = module.lattice_position();
        let _ = writeln!(out, "{},{},{}", x, y, z);
    }
    out
}

/// Pretty-printed JSON lattice description
pub fn to_json(registry: &ModuleRegistry) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&LatticeFile::from_registry(registry))?)
}

/// Fixed-column table: module id, then x, y, z
pub fn positional(registry: &ModuleRegistry) -> String {
    let mut out = String::from(POSITIONAL_HEADER);
    out.push('\n');
    for module in registry.iter() {
        let [x, y, z] = module.lattice_position();
        let _ = writeln!(out, "{:>6}{:>7}{:>7}{:>7}", module.id, x, y, z);
    }
    out
}

/// Write all three exports into `directory`, creating it if needed
///
/// Returns the written paths.
pub fn write_all<P: AsRef<Path>>(registry: &ModuleRegistry, directory: P) -> Result<Vec<PathBuf>, ExportError> {
    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;

    let outputs = [
        ("lattice.txt", lattice_dump(registry)),
        ("lattice.json", to_json(registry)?),
        ("positions.txt", positional(registry)),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (name, contents) in outputs {
        let path = directory.join(name);
        fs::write(&path, contents)?;
        log::info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Color, Module};
    use modbot_math::{ModuleShape, Vec3};

    fn registry() -> ModuleRegistry {
        [
            Module::new(1, ModuleShape::Cube, Vec3::new(2.0, 0.0, 1.0), Color::GRAY, 1.0),
            Module::new(0, ModuleShape::Cube, Vec3::new(0.0, -1.0, 0.0), Color::GRAY, 1.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lattice_dump() {
        assert_eq!(lattice_dump(&registry()), "0,-1,0\n2,0,1\n");
    }

    #[test]
    fn test_json_shape() {
        let json = to_json(&registry()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["order"], 3);
        assert_eq!(value["axisSize"], 3);
        assert_eq!(value["modules"][1]["position"], serde_json::json!([2, 0, 1]));
        assert_eq!(value["modules"][0]["static"], true);
    }

    #[test]
    fn test_json_round_trip() {
        let file = LatticeFile::from_registry(&registry());
        let parsed: LatticeFile = serde_json::from_str(&to_json(&registry()).unwrap()).unwrap();
        assert_eq!(parsed, file);
    }

    #[test]
    fn test_axis_size_of_empty_or_negative_lattice() {
        assert_eq!(LatticeFile::from_registry(&ModuleRegistry::new()).axis_size, 1);

        let negative: ModuleRegistry =
            [Module::new(0, ModuleShape::Cube, Vec3::new(-3.0, -1.0, -2.0), Color::GRAY, 1.0)].into_iter().collect();
        assert_eq!(LatticeFile::from_registry(&negative).axis_size, 1);
    }

    #[test]
    fn test_axis_size_at_coordinate_limit() {
        let far: ModuleRegistry =
            [Module::new(0, ModuleShape::Cube, Vec3::from_lattice([i32::MAX, 0, 0]), Color::GRAY, 1.0)]
                .into_iter()
                .collect();
        let file = LatticeFile::from_registry(&far);
        assert_eq!(file.axis_size, i32::MAX);
        assert!(to_json(&far).is_ok());
    }

    #[test]
    fn test_positional_columns() {
        let text = positional(&registry());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], POSITIONAL_HEADER);
        assert_eq!(lines[1], "     0      0     -1      0");
        assert_eq!(lines[2], "     1      2      0      1");
        assert_eq!(lines[1].len(), POSITIONAL_HEADER.len());
    }

    #[test]
    fn test_write_all() {
        let dir = std::env::temp_dir().join(format!("modbot_export_{}", std::process::id()));
        let written = write_all(&registry(), &dir).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), lattice_dump(&registry()));
        let _ = fs::remove_dir_all(&dir);
    }
}
