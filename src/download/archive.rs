//! In-memory ZIP assembly.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// One file to place in an archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Package entries into a deflate-compressed ZIP held in memory.
pub fn build_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
    if entries.is_empty() {
        return Err(Error::Archive("no entries to package".to_string()));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        zip.start_file(entry.filename.as_str(), options)?;
        zip.write_all(&entry.bytes)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
