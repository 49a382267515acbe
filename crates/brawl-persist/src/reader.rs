//! Population reader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use brawl_core::{Entity, EntityFactory, ParseError};
use brawl_engine::Registry;

use crate::error::PersistError;

/// A line that could not be turned into an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    /// Why it was skipped.
    pub error: ParseError,
}

/// Summary of a [`load`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    /// Entities now in the registry.
    pub loaded: usize,
    /// Malformed lines, in file order. Blank lines are not listed.
    pub skipped: Vec<SkippedLine>,
}

/// Parse every line of `reader` without touching any registry.
///
/// Nameless records get a placeholder name from `factory`.
pub fn read_entities<R: BufRead>(
    reader: R,
    factory: &mut EntityFactory,
) -> Result<(Vec<Entity>, Vec<SkippedLine>), PersistError> {
    let mut entities = Vec::new();
    let mut skipped = Vec::new();
    for (idx, raw) in reader.split(b'\n').enumerate() {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        let parsed = match std::str::from_utf8(&raw) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => factory.parse(line),
            Err(e) => Err(ParseError::InvalidEncoding {
                offset: e.valid_up_to(),
            }),
        };
        match parsed {
            Ok(entity) => entities.push(entity),
            Err(error) => {
                tracing::warn!(line = idx + 1, %error, "skipping malformed record");
                skipped.push(SkippedLine {
                    line: idx + 1,
                    error,
                });
            }
        }
    }
    Ok((entities, skipped))
}

/// Replace the population of `registry` with the records in `reader`.
///
/// The registry is only touched once the whole input has been read; an
/// I/O error leaves it unchanged.
pub fn load<R: BufRead>(
    registry: &Registry,
    reader: R,
    factory: &mut EntityFactory,
) -> Result<LoadReport, PersistError> {
    let (entities, skipped) = read_entities(reader, factory)?;
    let loaded = entities.len();
    registry.replace_all(entities);
    Ok(LoadReport { loaded, skipped })
}

/// [`load`] from a file.
pub fn load_from_path(
    registry: &Registry,
    path: impl AsRef<Path>,
    factory: &mut EntityFactory,
) -> Result<LoadReport, PersistError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let report = load(registry, BufReader::new(file), factory)?;
    tracing::info!(
        path = %path.display(),
        loaded = report.loaded,
        skipped = report.skipped.len(),
        "population loaded"
    );
    Ok(report)
}
