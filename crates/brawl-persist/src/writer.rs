//! Population writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use brawl_engine::Registry;

use crate::error::PersistError;

/// Which entities a save includes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaveScope {
    /// Living entities only.
    #[default]
    Living,
    /// Every entity, dead ones included.
    All,
}

/// Write one line per entity in `scope`, in registry order.
///
/// The population is copied under a single read lock, so the output is a
/// consistent picture even while the simulation runs. Returns the number
/// of lines written.
pub fn save<W: Write>(
    registry: &Registry,
    mut writer: W,
    scope: SaveScope,
) -> Result<usize, PersistError> {
    let entities = match scope {
        SaveScope::Living => registry.survivors(),
        SaveScope::All => registry.snapshot(),
    };
    for entity in &entities {
        writeln!(writer, "{}", entity.serialize())?;
    }
    writer.flush()?;
    Ok(entities.len())
}

/// [`save`] to a file, creating or truncating it.
pub fn save_to_path(
    registry: &Registry,
    path: impl AsRef<Path>,
    scope: SaveScope,
) -> Result<usize, PersistError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let written = save(registry, BufWriter::new(file), scope)?;
    tracing::info!(path = %path.display(), written, ?scope, "population saved");
    Ok(written)
}
