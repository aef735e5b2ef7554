use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;

pub const DEFAULT_MEDIA_EXT: &str = "mp3";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct GroupSummary {
    /// prefix -> file names moved into `<dir>/<prefix>/`
    pub groups: BTreeMap<String, Vec<String>>,
    /// Matching files without a `<prefix>-` part, left where they were.
    pub skipped: Vec<String>,
}

impl GroupSummary {
    pub fn moved(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Move every `<prefix>-<rest>.<ext>` file of `dir` into `dir/<prefix>/`.
pub fn group_by_prefix(dir: &Path, extension: &str) -> anyhow::Result<GroupSummary> {
    let extension = extension.trim_start_matches('.');
    let mut names: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read dir: {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read dir: {}", dir.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !matches_ext {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();

    let mut summary = GroupSummary::default();
    for name in names {
        let prefix = match name_prefix(&name) {
            Some(p) => p.to_string(),
            None => {
                summary.skipped.push(name);
                continue;
            }
        };
        let target_dir = dir.join(&prefix);
        std::fs::create_dir_all(&target_dir)
            .with_context(|| format!("create dir: {}", target_dir.display()))?;
        let from = dir.join(&name);
        let to = target_dir.join(&name);
        std::fs::rename(&from, &to)
            .with_context(|| format!("move {} -> {}", from.display(), to.display()))?;
        summary.groups.entry(prefix).or_default().push(name);
    }
    Ok(summary)
}

fn name_prefix(name: &str) -> Option<&str> {
    let (prefix, _) = name.split_once('-')?;
    (!prefix.is_empty()).then_some(prefix)
}
