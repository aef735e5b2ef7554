use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "trans-batch.toml";
pub const CONFIG_ENV: &str = "TRANS_BATCH_CONFIG";

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub translator: TranslatorSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
    /// Named jobs, one per language pair (e.g. `[jobs.love_CA]`).
    #[serde(default)]
    pub jobs: BTreeMap<String, JobSection>,
}

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TranslatorSection {
    /// Translator executable, looked up on PATH when not a path.
    #[serde(default)]
    pub program: Option<String>,
    /// Appended after the standard arguments on every call.
    #[serde(default)]
    pub extra_args: Vec<String>,
    /// Max chars of translator stderr / command lines kept in logs.
    #[serde(default)]
    pub log_max_chars: Option<usize>,
}

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DefaultsSection {
    #[serde(default)]
    pub source_lang: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub brief: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct JobSection {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub source_lang: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub brief: Option<bool>,
    #[serde(default)]
    pub dry_run: Option<bool>,
    #[serde(default)]
    pub report: Option<PathBuf>,
}

/// Look for `filename` in `start_dir` and up to `max_levels` parents.
pub fn find_file_upwards(start_dir: &Path, filename: &str, max_levels: usize) -> Option<PathBuf> {
    let mut dir = start_dir;
    for _ in 0..=max_levels {
        let candidate = dir.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
    None
}

pub fn find_default_config(filename: &str) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, filename, 8) {
            return Some(p);
        }
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, filename, 2) {
                return Some(p);
            }
        }
    }
    None
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    parse_config(&text).with_context(|| format!("parse config: {}", path.display()))
}

pub fn parse_config(text: &str) -> anyhow::Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(text).context("parse config toml")?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_jobs_and_sections() {
        let cfg = parse_config(
            r#"
[translator]
program = "/usr/local/bin/trans"
extra_args = ["-no-autocorrect"]

[defaults]
engine = "bing"

[jobs.love_YUE]
input = "../love_ZT/love_ZT.json"
source_lang = "zh-TW"
target_lang = "yue"
output_dir = "love_YUE/bing"

[jobs.love_CA]
input = "love_ESM/love_ESM.json"
source_lang = "es"
target_lang = "ca"
engine = "google"
brief = true
"#,
        )
        .expect("parse");

        assert_eq!(cfg.translator.program.as_deref(), Some("/usr/local/bin/trans"));
        assert_eq!(cfg.translator.extra_args, ["-no-autocorrect"]);
        assert_eq!(cfg.defaults.engine.as_deref(), Some("bing"));
        assert_eq!(cfg.jobs.keys().collect::<Vec<_>>(), ["love_CA", "love_YUE"]);
        assert_eq!(cfg.jobs["love_CA"].brief, Some(true));
        assert_eq!(cfg.jobs["love_YUE"].engine, None);
    }

    #[test]
    fn empty_file_is_default_config() {
        let cfg = parse_config("").expect("parse");
        assert!(cfg.jobs.is_empty());
        assert!(cfg.translator.program.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_config("[jobs.x]\nsource = \"en\"\n").is_err());
    }

    #[test]
    fn finds_file_in_parent_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(tmp.path().join(CONFIG_FILENAME), "").expect("write");
        assert_eq!(
            find_file_upwards(&nested, CONFIG_FILENAME, 8),
            Some(tmp.path().join(CONFIG_FILENAME))
        );
        assert_eq!(find_file_upwards(&nested, CONFIG_FILENAME, 1), None);
    }
}
