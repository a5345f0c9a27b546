//! JSON lines reading and writing for intermediate stage files.
//!
//! Each stage writes its output once and the next stage reads it in full.
//! Writes are not atomic: a crash mid-write leaves a truncated file, which
//! the reader reports as a malformed record on the last line.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// A writer that serializes one compact JSON object per line.
pub struct JsonlWriter<W: Write> {
    writer: W,
    items_written: usize,
}

impl JsonlWriter<BufWriter<File>> {
    /// Create (or truncate) a JSONL file, creating parent directories.
    pub fn create(path: &Path) -> PipelineResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            items_written: 0,
        }
    }

    /// Write a single item as one line.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }

    /// Write multiple items, one per line.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        for item in items {
            self.write(item)?;
        }
        Ok(())
    }

    /// Get the number of items written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Write `items` to `path` as JSON lines and return the count written.
pub fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> PipelineResult<usize> {
    let mut writer = JsonlWriter::create(path)?;
    writer
        .write_all(items)
        .and_then(|_| writer.flush())
        .map_err(|e| PipelineError::io(path, e))?;
    Ok(writer.items_written())
}

/// Read every record from a JSONL file.
///
/// Whitespace-only lines are skipped. The first line that does not parse as
/// `T` aborts the read with `MalformedRecord` naming the file and line.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> PipelineResult<Vec<T>> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    parse_jsonl(BufReader::new(file), path)
}

/// Parse JSONL from any reader; `origin` is used in error messages.
pub fn parse_jsonl<T: DeserializeOwned, R: BufRead>(
    reader: R,
    origin: &Path,
) -> PipelineResult<Vec<T>> {
    let mut items = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| PipelineError::io(origin, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|e| PipelineError::MalformedRecord {
            source_file: origin.to_path_buf(),
            line: idx + 1,
            message: e.to_string(),
        })?;
        items.push(item);
    }
    Ok(items)
}
