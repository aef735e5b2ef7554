use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;

use trans_batch::batch::{
    init_default_config, list_jobs, BatchConfig, BatchDriver, BatchOverrides, ProcessTranslator,
};
use trans_batch::progress::ConsoleProgress;
use trans_batch::tools::{
    default_harvest_output_for, group_by_prefix, strip_stress_marks_file, write_harvest,
    StressMode, DEFAULT_MEDIA_EXT,
};

#[derive(Parser, Debug)]
#[command(name = "trans-batch")]
#[command(about = "Batch-translate a JSON id->sentence mapping with translate-shell, one <id>.txt per entry", long_about = None)]
struct Args {
    /// Input JSON mapping identifiers to sentences (overrides the job's `input`)
    #[arg(value_name = "JSON")]
    input: Option<PathBuf>,

    /// Job name from the config file (`[jobs.<NAME>]`)
    #[arg(short, long, value_name = "NAME")]
    job: Option<String>,

    /// Source language code (e.g. en, zh-TW)
    #[arg(long)]
    source_lang: Option<String>,

    /// Target language code (e.g. es, yue)
    #[arg(long)]
    target_lang: Option<String>,

    /// Translation engine requested from the translator (google, bing, yandex, ...)
    #[arg(long)]
    engine: Option<String>,

    /// Directory for `<id>.txt` artifacts (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Ask the translator for brief output (`-b`)
    #[arg(long)]
    brief: bool,

    /// Translator executable (default: trans)
    #[arg(long, value_name = "PROGRAM")]
    translator: Option<String>,

    /// Write each would-be command line instead of running the translator
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON run report (per-entry status + content digest)
    #[arg(long, value_name = "JSON")]
    report: Option<PathBuf>,

    /// Config file path (default: $TRANS_BATCH_CONFIG, or trans-batch.toml searched upwards)
    #[arg(long)]
    config: Option<PathBuf>,

    /// List jobs from the config file, then exit
    #[arg(long)]
    list_jobs: bool,

    /// Generate a default config file, then exit
    #[arg(long)]
    init_config: bool,

    /// Directory to write the config file to (default: current directory)
    #[arg(long, value_name = "DIR")]
    init_config_dir: Option<PathBuf>,

    /// Overwrite an existing config file when used with --init-config
    #[arg(long)]
    force: bool,

    /// Move `<prefix>-<rest>` media files of DIR into per-prefix directories, then exit
    #[arg(long, value_name = "DIR")]
    group_by_prefix: Option<PathBuf>,

    /// Media file extension for --group-by-prefix
    #[arg(long, value_name = "EXT", default_value = DEFAULT_MEDIA_EXT)]
    media_ext: String,

    /// Collect `<id>.txt` files of DIR into one JSON mapping, then exit
    #[arg(long, value_name = "DIR")]
    harvest: Option<PathBuf>,

    /// Output for --harvest (default: <DIR>/fileIDAndSentences.json)
    #[arg(long, value_name = "JSON")]
    harvest_output: Option<PathBuf>,

    /// Remove stress marks (U+0301) from a JSON mapping, then exit (needs --stress-output)
    #[arg(long, value_name = "JSON")]
    strip_stress: Option<PathBuf>,

    /// Output for --strip-stress
    #[arg(long, value_name = "JSON")]
    stress_output: Option<PathBuf>,

    /// With --strip-stress: keep only lowercased Russian letters, one space between words
    #[arg(long)]
    letters_only: bool,

    /// No progress output on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let progress = ConsoleProgress::new(!args.quiet);

    if args.init_config {
        let dir = args
            .init_config_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let cfg_path = init_default_config(&dir, args.force).context("init default config")?;
        eprintln!("Wrote config: {}", cfg_path.display());
        return Ok(());
    }

    if args.list_jobs {
        for (name, summary) in list_jobs(args.config.clone())? {
            println!("{name}\t{summary}");
        }
        return Ok(());
    }

    if let Some(dir) = args.group_by_prefix.as_ref() {
        let summary = group_by_prefix(dir, &args.media_ext)?;
        for (prefix, files) in &summary.groups {
            progress.info(format!("{prefix}/: {} file(s)", files.len()));
        }
        for name in &summary.skipped {
            progress.warn(format!("no prefix, left in place: {name}"));
        }
        progress.info(format!(
            "Grouped {} file(s) into {} dir(s)",
            summary.moved(),
            summary.groups.len()
        ));
        return Ok(());
    }

    if let Some(dir) = args.harvest.as_ref() {
        let output = args
            .harvest_output
            .clone()
            .unwrap_or_else(|| default_harvest_output_for(dir));
        let n = write_harvest(dir, &output)?;
        progress.info(format!("Harvested {n} entries -> {}", output.display()));
        return Ok(());
    }

    if let Some(input) = args.strip_stress.as_ref() {
        let output = args
            .stress_output
            .clone()
            .context("missing --stress-output for --strip-stress")?;
        let mode = if args.letters_only {
            StressMode::LettersOnly
        } else {
            StressMode::MarksOnly
        };
        let n = strip_stress_marks_file(input, &output, mode)?;
        progress.info(format!("Stripped stress marks: {n} entries -> {}", output.display()));
        return Ok(());
    }

    let cfg = BatchConfig::from_overrides(BatchOverrides {
        config: args.config,
        job: args.job,
        input: args.input,
        source_lang: args.source_lang,
        target_lang: args.target_lang,
        engine: args.engine,
        output_dir: args.output_dir,
        brief: args.brief,
        dry_run: args.dry_run,
        translator: args.translator,
        report: args.report,
    })
    .context("build config")?;
    if let Some(p) = cfg.config_path.as_ref() {
        progress.info(format!("Config: {}", p.display()));
    }
    progress.info(format!("Input: {}", cfg.input.display()));

    let job = cfg.load_job()?;
    let translator = ProcessTranslator::new(cfg.log_max_chars);
    let mut driver = BatchDriver::new(cfg.driver_options(), translator, progress);
    let report = driver.run(&job)?;

    if let Some(path) = cfg.report.as_ref() {
        report.write_json(path)?;
    }

    let failed = report.failed_ids();
    if !failed.is_empty() {
        return Err(anyhow!(
            "{} of {} entries failed: {}",
            failed.len(),
            job.entries().len(),
            failed.join(", ")
        ));
    }
    Ok(())
}
