use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::driver::RunMode;
use super::job::TranslationJob;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    Succeeded { artifact: PathBuf, sha256: String },
    Failed { reason: String },
}

#[derive(Clone, Debug, Serialize)]
pub struct EntryRecord {
    pub id: String,
    #[serde(flatten)]
    pub outcome: EntryOutcome,
}

/// What a run did, one record per entry in processing order.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub source_lang: String,
    pub target_lang: String,
    pub engine: String,
    pub mode: RunMode,
    pub output_dir: PathBuf,
    pub entries: Vec<EntryRecord>,
}

impl RunReport {
    pub fn new(job: &TranslationJob, mode: RunMode, output_dir: &Path) -> Self {
        Self {
            source_lang: job.source_lang().to_string(),
            target_lang: job.target_lang().to_string(),
            engine: job.engine().to_string(),
            mode,
            output_dir: output_dir.to_path_buf(),
            entries: Vec::with_capacity(job.entries().len()),
        }
    }

    pub fn push_success(&mut self, id: &str, artifact: PathBuf, text: &str) {
        self.entries.push(EntryRecord {
            id: id.to_string(),
            outcome: EntryOutcome::Succeeded {
                artifact,
                sha256: sha256_hex(text),
            },
        });
    }

    pub fn push_failure(&mut self, id: &str, reason: impl std::fmt::Display) {
        self.entries.push(EntryRecord {
            id: id.to_string(),
            outcome: EntryOutcome::Failed {
                reason: reason.to_string(),
            },
        });
    }

    pub fn succeeded(&self) -> usize {
        self.entries
            .iter()
            .filter(|r| matches!(r.outcome, EntryOutcome::Succeeded { .. }))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|r| match &r.outcome {
            EntryOutcome::Failed { reason } => Some((r.id.as_str(), reason.as_str())),
            EntryOutcome::Succeeded { .. } => None,
        })
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.failures().map(|(id, _)| id).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create report dir: {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self).context("serialize report")?;
        std::fs::write(path, text).with_context(|| format!("write report: {}", path.display()))?;
        Ok(())
    }
}

pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
