//! `.rdr` script parsing and writing

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{Result, ScriptError};
use crate::sim::airplane::AirplaneParams;
use crate::sim::tower::TowerParams;

/// Required script file extension
pub const EXTENSION: &str = "rdr";

const AIRPLANE_TAG: &str = "A";
const TOWER_TAG: &str = "T";

/// Entities declared by a script, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub airplanes: Vec<AirplaneParams>,
    pub towers: Vec<TowerParams>,
}

impl Script {
    pub fn is_empty(&self) -> bool {
        self.airplanes.is_empty() && self.towers.is_empty()
    }
}

/// Reject paths not ending in `.rdr`
pub fn check_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(EXTENSION) => Ok(()),
        Some(other) => Err(ScriptError::Extension {
            found: format!(".{other}"),
        }),
        None => Err(ScriptError::Extension {
            found: String::new(),
        }),
    }
}

/// Parse script text. `file` only labels line errors.
pub fn parse(file: &str, text: &str) -> Result<Script> {
    let mut script = Script::default();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else {
            continue;
        };
        let expected = match tag {
            AIRPLANE_TAG => AirplaneParams::FIELD_COUNT,
            TOWER_TAG => TowerParams::FIELD_COUNT,
            _ => {
                return Err(ScriptError::UnrecognizedEntity {
                    file: file.to_string(),
                    line: line_no,
                    tag: tag.to_string(),
                });
            }
        };

        let values = tokens
            .map(|token| {
                token.parse::<f32>().map_err(|_| ScriptError::InvalidNumber {
                    file: file.to_string(),
                    line: line_no,
                    value: token.to_string(),
                })
            })
            .collect::<Result<Vec<f32>>>()?;
        if values.len() != expected {
            return Err(ScriptError::FieldCount {
                file: file.to_string(),
                line: line_no,
                expected,
                found: values.len(),
            });
        }

        if tag == AIRPLANE_TAG {
            let mut fields = [0.0; AirplaneParams::FIELD_COUNT];
            fields.copy_from_slice(&values);
            script.airplanes.push(AirplaneParams::from_fields(fields));
        } else {
            let mut fields = [0.0; TowerParams::FIELD_COUNT];
            fields.copy_from_slice(&values);
            script.towers.push(TowerParams::from_fields(fields));
        }
    }

    Ok(script)
}

/// Script text with every number written to one decimal place
pub fn render(script: &Script) -> String {
    let mut out = String::new();
    for airplane in &script.airplanes {
        write_line(&mut out, AIRPLANE_TAG, &airplane.to_fields());
    }
    for tower in &script.towers {
        write_line(&mut out, TOWER_TAG, &tower.to_fields());
    }
    out
}

fn write_line(out: &mut String, tag: &str, fields: &[f32]) {
    out.push_str(tag);
    for value in fields {
        // Writing to a String cannot fail
        let _ = write!(out, " {value:.1}");
    }
    out.push('\n');
}

fn io_error(path: &Path, source: std::io::Error) -> ScriptError {
    ScriptError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load and parse a script file
pub fn load(path: &Path) -> Result<Script> {
    check_extension(path)?;
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let script = parse(&file_label(path), &text)?;
    log::info!(
        "Loaded {} ({} airplanes, {} towers)",
        path.display(),
        script.airplanes.len(),
        script.towers.len()
    );
    Ok(script)
}

/// Like [`load`], but a missing file yields an empty script
pub fn load_or_empty(path: &Path) -> Result<Script> {
    match load(path) {
        Err(ScriptError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            log::info!("{} does not exist yet, starting empty", path.display());
            Ok(Script::default())
        }
        other => other,
    }
}

/// Write a script file, replacing any previous content
pub fn save(path: &Path, script: &Script) -> Result<()> {
    check_extension(path)?;
    std::fs::write(path, render(script)).map_err(|e| io_error(path, e))?;
    log::info!("Saved {}", path.display());
    Ok(())
}
