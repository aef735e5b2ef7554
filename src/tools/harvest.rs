use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::batch::ARTIFACT_EXT;
use crate::textutil::{collapse_newlines, decode_utf8_lossy};

pub const DEFAULT_HARVEST_FILENAME: &str = "fileIDAndSentences.json";

/// Read every `<id>.txt` of `dir` into id -> single-line text.
pub fn harvest_text_files(dir: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let suffix = format!(".{ARTIFACT_EXT}");
    let mut out = BTreeMap::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read dir: {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read dir: {}", dir.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name();
        let Some(id) = name.to_str().and_then(|n| n.strip_suffix(&suffix)) else {
            continue;
        };
        if id.is_empty() {
            continue;
        }
        let path = entry.path();
        let bytes = std::fs::read(&path).with_context(|| format!("read: {}", path.display()))?;
        out.insert(id.to_string(), collapse_newlines(&decode_utf8_lossy(&bytes)));
    }
    Ok(out)
}

pub fn default_harvest_output_for(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_HARVEST_FILENAME)
}

/// Harvest `dir` and write the mapping as pretty JSON. Returns the entry count.
pub fn write_harvest(dir: &Path, output: &Path) -> anyhow::Result<usize> {
    let harvested = harvest_text_files(dir)?;
    let text = serde_json::to_string_pretty(&harvested).context("serialize harvest")?;
    std::fs::write(output, text).with_context(|| format!("write: {}", output.display()))?;
    Ok(harvested.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_cleaned_text_by_identifier() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path();
        std::fs::write(dir.join("a1.txt"), "  hola\nmundo\n").expect("write");
        std::fs::write(dir.join("a2.txt"), "\u{feff}adiós\r\n").expect("write");
        std::fs::write(dir.join("love.v2.txt"), "te quiero").expect("write");
        std::fs::write(dir.join("notes.md"), "skip me").expect("write");
        std::fs::create_dir(dir.join("sub.txt")).expect("mkdir");

        let got = harvest_text_files(dir).expect("harvest");

        let want: BTreeMap<String, String> = [
            ("a1", "hola mundo"),
            ("a2", "adiós"),
            ("love.v2", "te quiero"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn writes_pretty_json_that_reads_back_as_job_input() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path();
        std::fs::write(dir.join("b.txt"), "dos").expect("write");
        std::fs::write(dir.join("a.txt"), "uno").expect("write");
        let output = default_harvest_output_for(dir);
        assert_eq!(output, dir.join("fileIDAndSentences.json"));

        assert_eq!(write_harvest(dir, &output).expect("write"), 2);

        let entries = crate::batch::load_entries(&output).expect("reload");
        let pairs: Vec<_> = entries.iter().map(|e| (e.id.as_str(), e.sentence.as_str())).collect();
        assert_eq!(pairs, [("a", "uno"), ("b", "dos")]);
    }
}
