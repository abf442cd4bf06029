//! Document sources and result sinks.
//!
//! Line extraction and reference loading happen outside this crate; a
//! [`DocumentSource`] is the single seam through which their output enters.
//! A [`ResultSink`] receives each document's record as soon as it completes.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use crate::error::Result;
use crate::model::Document;

use super::sweep::DocumentRecord;

/// Provides documents by key.
///
/// Keys only address documents within the source. Once a document is
/// loaded, logs and failure reports name it by its own `id`.
pub trait DocumentSource: Sync {
    fn ids(&self) -> Vec<String>;

    fn load(&self, id: &str) -> Result<Document>;
}

/// In-memory documents, keyed by their position.
impl DocumentSource for [Document] {
    fn ids(&self) -> Vec<String> {
        (0..self.len()).map(|i| i.to_string()).collect()
    }

    fn load(&self, id: &str) -> Result<Document> {
        let missing = || {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no document at position {}", id),
            )
        };
        let index: usize = id.parse().map_err(|_| missing())?;
        Ok(self.get(index).ok_or_else(missing)?.clone())
    }
}

/// One JSON-encoded [`Document`] per file.
///
/// A document with an empty `id` takes the file stem.
#[derive(Debug, Clone, Default)]
pub struct JsonDocumentSource {
    paths: Vec<PathBuf>,
}

impl JsonDocumentSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl DocumentSource for JsonDocumentSource {
    fn ids(&self) -> Vec<String> {
        self.paths.iter().map(|p| p.display().to_string()).collect()
    }

    fn load(&self, id: &str) -> Result<Document> {
        let path = PathBuf::from(id);
        let reader = BufReader::new(File::open(&path)?);
        let mut document: Document = serde_json::from_reader(reader)?;
        if document.id.is_empty() {
            document.id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| id.to_string());
        }
        Ok(document)
    }
}

/// Receives completed document records.
pub trait ResultSink: Send {
    fn write(&mut self, record: &DocumentRecord) -> Result<()>;
}

/// Writes one JSON record per line and flushes after each.
#[derive(Debug)]
pub struct JsonlSink<W: Write + Send> {
    writer: W,
    written: usize,
}

impl<W: Write + Send> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ResultSink for JsonlSink<W> {
    fn write(&mut self, record: &DocumentRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn write(&mut self, _record: &DocumentRecord) -> Result<()> {
        Ok(())
    }
}
