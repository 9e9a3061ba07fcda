//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one entity. Used for the
//! per-run diagnostics ledger.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use super::StorageError;

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all<'a, I>(&self, entities: I) -> Result<usize, StorageError>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Wrote {} entries to {:?}", count, self.path);

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Diagnostic;
    use tempfile::TempDir;

    fn sample() -> Vec<Diagnostic> {
        vec![
            Diagnostic::MissingColumn {
                column: "dots".to_string(),
            },
            Diagnostic::UnmatchedName {
                name: "Random Guest".to_string(),
                rows: 2,
                best_candidate: Some("Harshith Sai".to_string()),
                best_score: 33.3,
            },
        ]
    }

    fn read_back(path: &std::path::Path) -> Vec<Diagnostic> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_write_all() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("diagnostics.jsonl");

        let writer: JsonlWriter<Diagnostic> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&sample()).unwrap(), 2);
        assert_eq!(read_back(&path), sample());
    }

    #[test]
    fn test_jsonl_lines_are_tagged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("diagnostics.jsonl");

        JsonlWriter::new(path.clone()).write_all(&sample()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let first = text.lines().next().unwrap();

        assert!(first.contains("\"kind\":\"missing_column\""));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_jsonl_write_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("d.jsonl");
        let writer: JsonlWriter<Diagnostic> = JsonlWriter::new(path.clone());

        writer.write_all(&sample()).unwrap();
        writer.write_all(&sample()[..1]).unwrap();

        assert_eq!(read_back(&path).len(), 1);
    }

    #[test]
    fn test_jsonl_write_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.jsonl");
        let writer: JsonlWriter<Diagnostic> = JsonlWriter::new(path.clone());

        assert_eq!(writer.write_all(&[]).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
