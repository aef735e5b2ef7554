mod artifact;
mod config;
mod driver;
mod invocation;
mod job;
mod report;
mod translator;

pub use artifact::{artifact_file_name, ArtifactWriter, ARTIFACT_EXT};
pub use config::{init_default_config, list_jobs, BatchConfig, BatchOverrides, DEFAULT_ENGINE};
pub use driver::{BatchDriver, DriverOptions, RunMode};
pub use invocation::{Invocation, TranslatorSettings, DEFAULT_TRANSLATOR};
pub use job::{load_entries, parse_entries, Entry, TranslationJob};
pub use report::{EntryOutcome, EntryRecord, RunReport};
pub use translator::{ProcessTranslator, Translator};
