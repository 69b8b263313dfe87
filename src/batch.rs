//! Directory batch processing.
//!
//! Every `*.pdf` file of an input directory is turned into a `<stem>.json`
//! outline in an output directory. A document that fails never stops the
//! batch: it gets an empty outline and is recorded in the report.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use rayon::prelude::*;

use crate::analysis::OutlineExtractor;
use crate::error::{Error, Result};
use crate::model::Outline;
use crate::render::{to_json, JsonFormat};

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// Processing of a document began.
    Started {
        index: usize,
        total: usize,
        path: PathBuf,
    },
    /// A document was written with its outline.
    Finished {
        index: usize,
        path: PathBuf,
        entries: usize,
    },
    /// A document failed; an empty outline was written in its place.
    Failed {
        index: usize,
        path: PathBuf,
        error: String,
    },
}

/// The outcome of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOutcome {
    /// Input PDF
    pub input: PathBuf,
    /// Output JSON
    pub output: PathBuf,
    /// Number of outline entries written
    pub entries: usize,
    /// Failure message, if the document could not be processed
    pub error: Option<String>,
}

impl DocumentOutcome {
    /// Check if the document was processed without error.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a batch run, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    /// Number of documents seen.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of documents processed without error.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of documents that failed.
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// The failed documents.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Runs an extractor over a directory of PDFs.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    extractor: OutlineExtractor,
    format: JsonFormat,
    events: Option<Sender<BatchEvent>>,
}

impl BatchRunner {
    /// Create a runner.
    pub fn new(extractor: OutlineExtractor) -> Self {
        Self {
            extractor,
            format: JsonFormat::Pretty,
            events: None,
        }
    }

    /// Set the JSON format of the written files.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Send progress events to a channel.
    pub fn with_events(mut self, sender: Sender<BatchEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Process every PDF in `input_dir`, writing outlines to `output_dir`.
    ///
    /// Fails only when the input directory cannot be listed or the output
    /// directory cannot be created.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
    ) -> Result<BatchReport> {
        let inputs = collect_inputs(input_dir.as_ref())?;
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        let total = inputs.len();
        log::info!(
            "Processing {} documents into {}",
            total,
            output_dir.display()
        );

        let process = |(index, input): (usize, &PathBuf)| {
            self.process_one(index, total, input, output_dir)
        };
        let outcomes: Vec<DocumentOutcome> = if self.extractor.options().parallel {
            inputs.par_iter().enumerate().map(process).collect()
        } else {
            inputs.iter().enumerate().map(process).collect()
        };

        let report = BatchReport { outcomes };
        log::info!(
            "Batch complete: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    fn process_one(
        &self,
        index: usize,
        total: usize,
        input: &Path,
        output_dir: &Path,
    ) -> DocumentOutcome {
        self.emit(BatchEvent::Started {
            index,
            total,
            path: input.to_path_buf(),
        });

        let (outline, mut error) = match self.extractor.try_extract_path(input) {
            Ok(outline) => (outline, None),
            Err(e) => {
                log::warn!("Failed to extract outline from {}: {}", input.display(), e);
                (Outline::empty(), Some(e.to_string()))
            }
        };

        let output = output_path(output_dir, input, index);
        if let Err(e) = self.write(&outline, &output) {
            log::warn!("Failed to write {}: {}", output.display(), e);
            error.get_or_insert(e.to_string());
        }

        let entries = outline.entries.len();
        match &error {
            None => self.emit(BatchEvent::Finished {
                index,
                path: input.to_path_buf(),
                entries,
            }),
            Some(message) => self.emit(BatchEvent::Failed {
                index,
                path: input.to_path_buf(),
                error: message.clone(),
            }),
        }

        DocumentOutcome {
            input: input.to_path_buf(),
            output,
            entries,
            error,
        }
    }

    fn write(&self, outline: &Outline, output: &Path) -> Result<()> {
        let json = to_json(outline, self.format)?;
        fs::write(output, json)?;
        Ok(())
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(sender) = &self.events {
            // A dropped receiver just means nobody is watching
            let _ = sender.send(event);
        }
    }
}

/// List the PDF files of a directory, sorted by path.
///
/// The extension check is case-insensitive; subdirectories are not
/// searched.
pub fn collect_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("input directory not found: {}", dir.display()),
        )));
    }

    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf && path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

fn output_path(output_dir: &Path, input: &Path, index: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("document-{}", index + 1));
    output_dir.join(format!("{}.json", stem))
}
