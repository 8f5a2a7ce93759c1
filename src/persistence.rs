// File: src/persistence.rs
use crate::core::snapshot::ModelSnapshot;
use crate::errors::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes a snapshot atomically: bincode into a temp file next to `path`, then rename.
pub fn save_to_disk(snapshot: &ModelSnapshot, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, snapshot)?;
        writer.flush()?;
    }

    temp_file.persist(path)?;
    tracing::info!(
        path = %path.display(),
        translation_entries = snapshot.translation.len(),
        "model snapshot saved"
    );
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<ModelSnapshot> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let snapshot: ModelSnapshot = bincode::deserialize_from(reader)?;
    snapshot.validate()?;

    tracing::info!(
        path = %path.display(),
        iterations = snapshot.metadata.iterations,
        "model snapshot loaded"
    );
    Ok(snapshot)
}
