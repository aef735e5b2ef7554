//! File bookkeeping around batch runs: grouping media by prefix, harvesting
//! artifacts back into a mapping, normalizing accented source mappings.

mod grouper;
mod harvest;
mod stress;

pub use grouper::{group_by_prefix, GroupSummary, DEFAULT_MEDIA_EXT};
pub use harvest::{default_harvest_output_for, harvest_text_files, write_harvest};
pub use stress::{strip_stress_marks_file, StressMode};
