//! Persisting documents and driving batches.
//!
//! Every document is assembled in memory and written with a single call, so
//! a failed write never leaves a half-built seed behind. Failures are per
//! document: they are logged, counted in the manifest, and the batch moves on.

use crate::error::Result;
use crate::generator::{DocumentGenerator, DocumentSummary};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// File name of the per-batch manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub bytes: usize,
    pub oversized: bool,
}

/// Writes finished byte sequences and flags documents over budget.
#[derive(Debug, Clone, Copy)]
pub struct CorpusWriter {
    size_budget: usize,
}

impl CorpusWriter {
    pub fn new(size_budget: usize) -> Self {
        Self { size_budget }
    }

    pub fn size_budget(&self) -> usize {
        self.size_budget
    }

    /// Size over budget is reported, not refused.
    pub fn write(&self, bytes: &[u8], path: &Path) -> Result<WriteOutcome> {
        fs::write(path, bytes)?;
        let oversized = bytes.len() > self.size_budget;
        if oversized {
            warn!(
                path = %path.display(),
                bytes = bytes.len(),
                budget = self.size_budget,
                "document exceeds size budget"
            );
        }
        Ok(WriteOutcome {
            bytes: bytes.len(),
            oversized,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    Written { bytes: usize, oversized: bool },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file: String,
    #[serde(flatten)]
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub document: Option<DocumentSummary>,
}

/// Batch record written next to the seeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub written: usize,
    pub failed: usize,
    pub oversized: usize,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn record_written(&mut self, file: String, outcome: WriteOutcome, document: Option<DocumentSummary>) {
        self.written += 1;
        if outcome.oversized {
            self.oversized += 1;
        }
        self.entries.push(ManifestEntry {
            file,
            status: EntryStatus::Written {
                bytes: outcome.bytes,
                oversized: outcome.oversized,
            },
            document,
        });
    }

    pub fn record_failed(&mut self, file: String, err: &dyn std::fmt::Display) {
        self.failed += 1;
        self.entries.push(ManifestEntry {
            file,
            status: EntryStatus::Failed {
                error: err.to_string(),
            },
            document: None,
        });
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

/// A numbered batch of generated documents in one output directory.
#[derive(Debug, Clone)]
pub struct Corpus<'a> {
    generator: DocumentGenerator<'a>,
    writer: CorpusWriter,
    output_dir: PathBuf,
    prefix: String,
}

impl<'a> Corpus<'a> {
    pub fn new(generator: DocumentGenerator<'a>, output_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        let writer = CorpusWriter::new(generator.config().size_budget);
        Self {
            generator,
            writer,
            output_dir: output_dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Path of the `index`-th document (1-based).
    pub fn file_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!("{}_{index}.pdf", self.prefix))
    }

    /// Generate `count` documents in order. Only directory creation and the
    /// manifest write can fail the whole batch.
    pub fn run<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Manifest> {
        fs::create_dir_all(&self.output_dir)?;
        let mut manifest = Manifest::default();

        for index in 1..=count {
            let path = self.file_path(index);
            let file = display_name(&path);
            let result = self.generator.generate(rng).and_then(|doc| {
                let outcome = self.writer.write(doc.bytes(), &path)?;
                Ok((outcome, doc.summary()))
            });
            match result {
                Ok((outcome, summary)) => manifest.record_written(file, outcome, Some(summary)),
                Err(err) => {
                    error!(path = %path.display(), error = %err, "failed to write document");
                    manifest.record_failed(file, &err);
                }
            }
        }

        manifest.save(&self.output_dir)?;
        info!(
            dir = %self.output_dir.display(),
            written = manifest.written,
            failed = manifest.failed,
            oversized = manifest.oversized,
            "batch complete"
        );
        Ok(manifest)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::TemplatePool;
    use crate::config::GeneratorConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    #[test]
    fn test_write_under_budget() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.pdf");
        let outcome = CorpusWriter::new(100).write(b"%PDF-1.4\n", &path).unwrap();
        assert_eq!(outcome, WriteOutcome { bytes: 9, oversized: false });
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.4\n");
    }

    #[test]
    fn test_write_over_budget_still_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.pdf");
        let data = vec![b'x'; 64];
        let outcome = CorpusWriter::new(32).write(&data, &path).unwrap();
        assert!(outcome.oversized);
        assert_eq!(fs::metadata(&path).unwrap().len(), 64);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("a.pdf");
        assert!(CorpusWriter::new(100).write(b"x", &path).is_err());
    }

    #[test]
    fn test_batch_writes_numbered_files_and_manifest() {
        let dir = TempDir::new().unwrap();
        let generator = DocumentGenerator::new(GeneratorConfig::varied(), TemplatePool::standard()).unwrap();
        let corpus = Corpus::new(generator, dir.path().join("out"), "generated_1");

        let manifest = corpus.run(5, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(manifest.written, 5);
        assert_eq!(manifest.failed, 0);
        for index in 1..=5 {
            assert!(dir.path().join("out").join(format!("generated_1_{index}.pdf")).exists());
        }

        let saved: Manifest =
            serde_json::from_str(&fs::read_to_string(dir.path().join("out").join(MANIFEST_FILE)).unwrap()).unwrap();
        assert_eq!(saved, manifest);
        assert_eq!(saved.entries[0].file, "generated_1_1.pdf");
    }

    #[test]
    fn test_failed_document_does_not_stop_batch() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        // a directory squatting on the second file name makes that write fail
        fs::create_dir_all(out.join("seed_2.pdf")).unwrap();

        let generator = DocumentGenerator::new(GeneratorConfig::varied(), TemplatePool::standard()).unwrap();
        let corpus = Corpus::new(generator, &out, "seed");
        let manifest = corpus.run(3, &mut StdRng::seed_from_u64(2)).unwrap();

        assert_eq!(manifest.written, 2);
        assert_eq!(manifest.failed, 1);
        assert!(matches!(manifest.entries[1].status, EntryStatus::Failed { .. }));
        assert!(out.join("seed_3.pdf").is_file());
    }
}
