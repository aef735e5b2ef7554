use std::path::PathBuf;

use serde::Serialize;

use crate::error::{BatchError, InvocationError};
use crate::progress::{ConsoleProgress, EntryStatus};
use crate::textutil::truncate_chars;

use super::artifact::ArtifactWriter;
use super::invocation::{Invocation, TranslatorSettings};
use super::job::{Entry, TranslationJob};
use super::report::RunReport;
use super::translator::Translator;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Run the translator and store its output.
    Execute,
    /// Store the would-be shell line instead of running anything.
    DryRun,
}

#[derive(Clone, Debug)]
pub struct DriverOptions {
    pub output_dir: PathBuf,
    pub mode: RunMode,
    pub translator: TranslatorSettings,
    pub log_max_chars: usize,
}

impl DriverOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            mode: RunMode::Execute,
            translator: TranslatorSettings::default(),
            log_max_chars: 240,
        }
    }
}

/// Translates a job entry by entry, one artifact per entry.
///
/// Per-entry translator failures are recorded in the report and the run moves
/// on. Failing to write into the output directory ends the run.
pub struct BatchDriver<T> {
    options: DriverOptions,
    translator: T,
    progress: ConsoleProgress,
}

impl<T: Translator> BatchDriver<T> {
    pub fn new(options: DriverOptions, translator: T, progress: ConsoleProgress) -> Self {
        Self {
            options,
            translator,
            progress,
        }
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    pub fn run(&mut self, job: &TranslationJob) -> Result<RunReport, BatchError> {
        let writer = ArtifactWriter::create(&self.options.output_dir)?;
        let total = job.entries().len();
        self.progress.info(format!(
            "Job: {} via {} ({} entries, {:?}) -> {}",
            job.lang_pair(),
            job.engine(),
            total,
            self.options.mode,
            writer.dir().display()
        ));

        let mut report = RunReport::new(job, self.options.mode, writer.dir());
        for (idx, entry) in job.entries().iter().enumerate() {
            let invocation = Invocation::for_sentence(&self.options.translator, job, &entry.sentence);
            self.progress.info(format!(
                "{}: {}",
                entry.id,
                truncate_chars(&invocation.to_shell_line(), self.options.log_max_chars)
            ));

            match self.produce(entry, &invocation) {
                Ok(text) => {
                    let path = writer.write(&entry.id, &text)?;
                    report.push_success(&entry.id, path, &text);
                    let status = match self.options.mode {
                        RunMode::Execute => EntryStatus::Translated,
                        RunMode::DryRun => EntryStatus::Planned,
                    };
                    self.progress.entry(idx + 1, total, &entry.id, status);
                }
                Err(err) if err.is_entry_local() => {
                    writer.remove(&entry.id)?;
                    report.push_failure(&entry.id, &err);
                    let reason = err.to_string();
                    self.progress
                        .entry(idx + 1, total, &entry.id, EntryStatus::Failed(&reason));
                }
                Err(err) => return Err(err),
            }
        }

        let failed = total - report.succeeded();
        if failed > 0 {
            self.progress
                .warn(format!("Done: {} ok, {failed} failed", report.succeeded()));
        } else {
            self.progress.info(format!("Done: {total} ok"));
        }
        Ok(report)
    }

    fn produce(&mut self, entry: &Entry, invocation: &Invocation) -> Result<String, BatchError> {
        match self.options.mode {
            RunMode::DryRun => Ok(format!("{}\n", invocation.to_shell_line())),
            RunMode::Execute => {
                let failed = |source: InvocationError| BatchError::TranslationInvocationFailed {
                    id: entry.id.clone(),
                    source,
                };
                let text = self.translator.translate(invocation).map_err(failed)?;
                if text.trim().is_empty() {
                    return Err(failed(InvocationError::EmptyOutput));
                }
                Ok(text)
            }
        }
    }
}
