use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::textutil::{russian_letters_only, strip_stress_marks};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StressMode {
    /// Remove U+0301 and nothing else.
    #[default]
    MarksOnly,
    /// Keep lowercased Russian letters only; punctuation, digits, Latin and
    /// stress marks all go.
    LettersOnly,
}

impl StressMode {
    fn apply(self, sentence: &str) -> String {
        match self {
            StressMode::MarksOnly => strip_stress_marks(sentence),
            StressMode::LettersOnly => russian_letters_only(sentence, false),
        }
    }
}

/// Drop stress marks from every sentence of an id -> sentence JSON file and
/// write the result sorted by id with 4-space indentation.
pub fn strip_stress_marks_file(
    input: &Path,
    output: &Path,
    mode: StressMode,
) -> anyhow::Result<usize> {
    let text =
        std::fs::read_to_string(input).with_context(|| format!("read: {}", input.display()))?;
    let mapping: BTreeMap<String, String> =
        serde_json::from_str(text.trim_start_matches('\u{feff}'))
            .with_context(|| format!("parse: {}", input.display()))?;

    let stripped: BTreeMap<String, String> = mapping
        .into_iter()
        .map(|(id, sentence)| (id, mode.apply(&sentence)))
        .collect();

    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    stripped.serialize(&mut ser).context("serialize")?;
    std::fs::write(output, &buf).with_context(|| format!("write: {}", output.display()))?;
    Ok(stripped.len())
}
