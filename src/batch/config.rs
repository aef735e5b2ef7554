use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::{
    find_default_config, load_config, AppConfig, JobSection, CONFIG_ENV, CONFIG_FILENAME,
};
use crate::error::BatchError;

use super::driver::{DriverOptions, RunMode};
use super::invocation::{TranslatorSettings, DEFAULT_TRANSLATOR};
use super::job::{load_entries, TranslationJob};

pub const DEFAULT_ENGINE: &str = "google";

/// Values given on the command line. `None` / `false` defer to the config file.
#[derive(Clone, Debug, Default)]
pub struct BatchOverrides {
    pub config: Option<PathBuf>,
    pub job: Option<String>,
    pub input: Option<PathBuf>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub engine: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub brief: bool,
    pub dry_run: bool,
    pub translator: Option<String>,
    pub report: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    pub config_path: Option<PathBuf>,
    pub job_name: Option<String>,
    pub input: PathBuf,
    pub source_lang: String,
    pub target_lang: String,
    pub engine: String,
    pub output_dir: PathBuf,
    pub report: Option<PathBuf>,
    pub mode: RunMode,
    pub translator: TranslatorSettings,
    pub log_max_chars: usize,
}

impl BatchConfig {
    /// Locate and load the config file (`--config`, `$TRANS_BATCH_CONFIG`, or
    /// `trans-batch.toml` searched upwards), then apply the overrides.
    pub fn from_overrides(overrides: BatchOverrides) -> anyhow::Result<Self> {
        let (file_cfg, cfg_path) = locate_config(overrides.config.clone())?;
        let cfg = Self::resolve(&file_cfg, cfg_path.as_deref(), overrides)?;
        Ok(cfg)
    }

    /// Precedence: command line, then the selected job, then `[defaults]`,
    /// then built-in defaults. Relative paths from the file are taken
    /// relative to the file's directory.
    pub fn resolve(
        file_cfg: &AppConfig,
        config_path: Option<&Path>,
        overrides: BatchOverrides,
    ) -> Result<Self, BatchError> {
        let config_dir = config_path
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let from_file = |p: &PathBuf| {
            if p.is_relative() {
                config_dir.join(p)
            } else {
                p.clone()
            }
        };

        let empty_job = JobSection::default();
        let job = match overrides.job.as_deref() {
            Some(name) => file_cfg.jobs.get(name).ok_or_else(|| {
                let known = file_cfg.jobs.keys().cloned().collect::<Vec<_>>();
                BatchError::InvalidConfig(format!(
                    "unknown job {name:?} (configured: {})",
                    if known.is_empty() {
                        "none".to_string()
                    } else {
                        known.join(", ")
                    }
                ))
            })?,
            None => &empty_job,
        };
        let defaults = &file_cfg.defaults;

        let input = overrides
            .input
            .or_else(|| job.input.as_ref().map(from_file))
            .ok_or_else(|| {
                BatchError::InvalidConfig(
                    "no input mapping: pass INPUT or select a --job with `input`".to_string(),
                )
            })?;

        let pick = |cli: Option<String>, job: &Option<String>, def: &Option<String>| {
            cli.or_else(|| job.clone())
                .or_else(|| def.clone())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let source_lang = pick(overrides.source_lang, &job.source_lang, &defaults.source_lang)
            .ok_or_else(|| BatchError::InvalidConfig("missing source language".to_string()))?;
        let target_lang = pick(overrides.target_lang, &job.target_lang, &defaults.target_lang)
            .ok_or_else(|| BatchError::InvalidConfig("missing target language".to_string()))?;
        let engine = pick(overrides.engine, &job.engine, &defaults.engine)
            .unwrap_or_else(|| DEFAULT_ENGINE.to_string());

        let output_dir = overrides
            .output_dir
            .or_else(|| job.output_dir.as_ref().map(from_file))
            .or_else(|| defaults.output_dir.as_ref().map(from_file))
            .unwrap_or_else(|| PathBuf::from("."));
        let report = overrides
            .report
            .or_else(|| job.report.as_ref().map(from_file));

        let mode = if overrides.dry_run || job.dry_run.unwrap_or(false) {
            RunMode::DryRun
        } else {
            RunMode::Execute
        };

        let translator = TranslatorSettings {
            program: overrides
                .translator
                .or_else(|| file_cfg.translator.program.clone())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_TRANSLATOR.to_string()),
            brief: overrides.brief || job.brief.or(defaults.brief).unwrap_or(false),
            extra_args: file_cfg.translator.extra_args.clone(),
        };
        let log_max_chars = file_cfg.translator.log_max_chars.unwrap_or(240).max(16);

        Ok(Self {
            config_path: config_path.map(Path::to_path_buf),
            job_name: overrides.job,
            input,
            source_lang,
            target_lang,
            engine,
            output_dir,
            report,
            mode,
            translator,
            log_max_chars,
        })
    }

    /// Read the input mapping. Language codes are validated here as well, so
    /// nothing is spawned for a job that cannot run.
    pub fn load_job(&self) -> Result<TranslationJob, BatchError> {
        let entries = load_entries(&self.input)?;
        TranslationJob::new(&self.source_lang, &self.target_lang, &self.engine, entries)
    }

    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            output_dir: self.output_dir.clone(),
            mode: self.mode,
            translator: self.translator.clone(),
            log_max_chars: self.log_max_chars,
        }
    }
}

fn locate_config(explicit: Option<PathBuf>) -> anyhow::Result<(AppConfig, Option<PathBuf>)> {
    let named = explicit.or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));
    if let Some(path) = named {
        let cfg = load_config(&path)?;
        return Ok((cfg, Some(path)));
    }
    match find_default_config(CONFIG_FILENAME) {
        Some(path) => {
            let cfg = load_config(&path)?;
            Ok((cfg, Some(path)))
        }
        None => Ok((AppConfig::default(), None)),
    }
}

pub fn list_jobs(config: Option<PathBuf>) -> anyhow::Result<Vec<(String, String)>> {
    let (cfg, _) = locate_config(config)?;
    Ok(cfg
        .jobs
        .iter()
        .map(|(name, job)| {
            let pair = format!(
                "{}:{} via {}",
                job.source_lang.as_deref().or(cfg.defaults.source_lang.as_deref()).unwrap_or("?"),
                job.target_lang.as_deref().or(cfg.defaults.target_lang.as_deref()).unwrap_or("?"),
                job.engine
                    .as_deref()
                    .or(cfg.defaults.engine.as_deref())
                    .unwrap_or(DEFAULT_ENGINE),
            );
            (name.clone(), pair)
        })
        .collect())
}

pub fn init_default_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create config dir: {}", dir.display()))?;
    let cfg_path = dir.join(CONFIG_FILENAME);
    if cfg_path.exists() && !force {
        return Ok(cfg_path);
    }
    std::fs::write(&cfg_path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("write config: {}", cfg_path.display()))?;
    Ok(cfg_path)
}

const DEFAULT_CONFIG_TOML: &str = r#"[translator]
# translate-shell executable (https://github.com/soimort/translate-shell).
program = "trans"
# Appended to every call, after `-no-ansi -engine=<engine> [-b]`.
extra_args = []
log_max_chars = 240

[defaults]
engine = "google"
brief = false
# output_dir = "."

# One section per language pair. Relative paths are resolved against this file.
# Run with: trans-batch --job love_CA

# [jobs.love_CA]
# input = "love_ESM/love_ESM.json"
# source_lang = "es"
# target_lang = "ca"
# engine = "google"
# output_dir = "love_CA/google"
# brief = true
# report = "love_CA/google/_report.json"

# [jobs.love_YUE]
# input = "love_ZT/love_ZT.json"
# source_lang = "zh-TW"
# target_lang = "yue"
# engine = "bing"
# output_dir = "love_YUE/bing"
# dry_run = true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    const CFG: &str = r#"
[translator]
program = "trans-dev"
extra_args = ["-no-autocorrect"]

[defaults]
engine = "bing"
output_dir = "out"

[jobs.love_CA]
input = "love_ESM/love_ESM.json"
source_lang = "es"
target_lang = "ca"
engine = "google"
output_dir = "love_CA/google"
brief = true
report = "love_CA/report.json"

[jobs.love_KZ]
input = "/data/love_EN.json"
source_lang = "en"
target_lang = "kk"
dry_run = true
"#;

    fn resolve(overrides: BatchOverrides) -> Result<BatchConfig, BatchError> {
        let cfg = parse_config(CFG).expect("parse");
        BatchConfig::resolve(&cfg, Some(Path::new("/proj/trans-batch.toml")), overrides)
    }

    #[test]
    fn job_values_resolve_against_config_dir() {
        let cfg = resolve(BatchOverrides {
            job: Some("love_CA".to_string()),
            ..Default::default()
        })
        .expect("resolve");
        assert_eq!(cfg.input, PathBuf::from("/proj/love_ESM/love_ESM.json"));
        assert_eq!(cfg.output_dir, PathBuf::from("/proj/love_CA/google"));
        assert_eq!(cfg.report, Some(PathBuf::from("/proj/love_CA/report.json")));
        assert_eq!((cfg.source_lang.as_str(), cfg.target_lang.as_str()), ("es", "ca"));
        assert_eq!(cfg.engine, "google");
        assert_eq!(cfg.mode, RunMode::Execute);
        assert_eq!(cfg.translator.program, "trans-dev");
        assert!(cfg.translator.brief);
        assert_eq!(cfg.translator.extra_args, ["-no-autocorrect"]);
    }

    #[test]
    fn defaults_fill_gaps_and_absolute_paths_stay() {
        let cfg = resolve(BatchOverrides {
            job: Some("love_KZ".to_string()),
            ..Default::default()
        })
        .expect("resolve");
        assert_eq!(cfg.input, PathBuf::from("/data/love_EN.json"));
        assert_eq!(cfg.engine, "bing");
        assert_eq!(cfg.output_dir, PathBuf::from("/proj/out"));
        assert_eq!(cfg.mode, RunMode::DryRun);
        assert!(!cfg.translator.brief);
    }

    #[test]
    fn command_line_wins() {
        let cfg = resolve(BatchOverrides {
            job: Some("love_CA".to_string()),
            input: Some(PathBuf::from("other.json")),
            target_lang: Some("fr".to_string()),
            engine: Some("yandex".to_string()),
            output_dir: Some(PathBuf::from("here")),
            translator: Some("/bin/trans".to_string()),
            dry_run: true,
            ..Default::default()
        })
        .expect("resolve");
        assert_eq!(cfg.input, PathBuf::from("other.json"));
        assert_eq!(cfg.target_lang, "fr");
        assert_eq!(cfg.source_lang, "es");
        assert_eq!(cfg.engine, "yandex");
        assert_eq!(cfg.output_dir, PathBuf::from("here"));
        assert_eq!(cfg.translator.program, "/bin/trans");
        assert_eq!(cfg.mode, RunMode::DryRun);
    }

    #[test]
    fn without_config_file_uses_builtin_defaults() {
        let cfg = BatchConfig::resolve(
            &AppConfig::default(),
            None,
            BatchOverrides {
                input: Some(PathBuf::from("love_EN.json")),
                source_lang: Some("en".to_string()),
                target_lang: Some("es".to_string()),
                ..Default::default()
            },
        )
        .expect("resolve");
        assert_eq!(cfg.engine, DEFAULT_ENGINE);
        assert_eq!(cfg.output_dir, PathBuf::from("."));
        assert_eq!(cfg.translator, TranslatorSettings::default());
        assert_eq!(cfg.log_max_chars, 240);
    }

    #[test]
    fn unknown_job_lists_configured_ones() {
        let err = resolve(BatchOverrides {
            job: Some("love_XX".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: unknown job \"love_XX\" (configured: love_CA, love_KZ)"
        );
    }

    #[test]
    fn missing_input_or_language_is_invalid() {
        assert!(resolve(BatchOverrides::default()).is_err());
        let err = resolve(BatchOverrides {
            input: Some(PathBuf::from("x.json")),
            source_lang: Some("en".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("missing target language"));
    }

    #[test]
    fn load_job_reads_entries_and_validates_languages() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let input = tmp.path().join("in.json");
        std::fs::write(&input, r#"{"a1": "hello world"}"#).expect("write");
        let mut cfg = BatchConfig::resolve(
            &AppConfig::default(),
            None,
            BatchOverrides {
                input: Some(input),
                source_lang: Some("en".to_string()),
                target_lang: Some("es".to_string()),
                ..Default::default()
            },
        )
        .expect("resolve");
        let job = cfg.load_job().expect("load");
        assert_eq!(job.entries().len(), 1);

        cfg.target_lang = "spanish!".to_string();
        assert!(matches!(cfg.load_job(), Err(BatchError::InvalidConfig(_))));
    }

    #[test]
    fn init_config_writes_parsable_file_once() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = init_default_config(tmp.path(), false).expect("init");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.translator.program.as_deref(), Some("trans"));
        assert!(cfg.jobs.is_empty());

        std::fs::write(&path, "# mine\n").expect("edit");
        init_default_config(tmp.path(), false).expect("init again");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "# mine\n");
        init_default_config(tmp.path(), true).expect("force");
        assert_ne!(std::fs::read_to_string(&path).expect("read"), "# mine\n");
    }

    #[test]
    fn list_jobs_reads_explicit_config() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("custom.toml");
        std::fs::write(&path, CFG).expect("write");
        let jobs = list_jobs(Some(path)).expect("list");
        assert_eq!(
            jobs,
            [
                ("love_CA".to_string(), "es:ca via google".to_string()),
                ("love_KZ".to_string(), "en:kk via bing".to_string()),
            ]
        );
    }
}
