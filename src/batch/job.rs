use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::BatchError;
use crate::textutil::is_valid_lang_code;

use super::artifact::is_valid_identifier;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub sentence: String,
}

/// Entries sharing one language pair and engine, in input order.
#[derive(Clone, Debug)]
pub struct TranslationJob {
    source_lang: String,
    target_lang: String,
    engine: String,
    entries: Vec<Entry>,
}

impl TranslationJob {
    pub fn new(
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        engine: impl Into<String>,
        entries: Vec<Entry>,
    ) -> Result<Self, BatchError> {
        let source_lang = source_lang.into().trim().to_string();
        let target_lang = target_lang.into().trim().to_string();
        let engine = engine.into().trim().to_string();
        if !is_valid_lang_code(&source_lang) {
            return Err(BatchError::InvalidConfig(format!(
                "bad source language code: {source_lang:?}"
            )));
        }
        if target_lang == "auto" || !is_valid_lang_code(&target_lang) {
            return Err(BatchError::InvalidConfig(format!(
                "bad target language code: {target_lang:?}"
            )));
        }
        if !is_valid_engine(&engine) {
            return Err(BatchError::InvalidConfig(format!("bad engine name: {engine:?}")));
        }
        Ok(Self {
            source_lang,
            target_lang,
            engine,
            entries,
        })
    }

    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// `<src>:<tgt>`, the language argument understood by translate-shell.
    pub fn lang_pair(&self) -> String {
        format!("{}:{}", self.source_lang, self.target_lang)
    }
}

fn is_valid_engine(engine: &str) -> bool {
    !engine.is_empty()
        && engine
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Read an identifier -> sentence JSON object, keeping key order.
pub fn load_entries(path: &Path) -> Result<Vec<Entry>, BatchError> {
    let bytes = std::fs::read(path).map_err(|e| BatchError::malformed(path, e.to_string()))?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| BatchError::malformed(path, format!("not UTF-8: {e}")))?;
    parse_entries(path, text.trim_start_matches('\u{feff}'))
}

pub fn parse_entries(path: &Path, text: &str) -> Result<Vec<Entry>, BatchError> {
    let OrderedEntries(pairs) =
        serde_json::from_str(text).map_err(|e| BatchError::malformed(path, e.to_string()))?;

    let mut entries = Vec::with_capacity(pairs.len());
    for (id, sentence) in pairs {
        if !is_valid_identifier(&id) {
            return Err(BatchError::malformed(
                path,
                format!("identifier {id:?} cannot name an artifact file"),
            ));
        }
        if sentence.trim().is_empty() {
            return Err(BatchError::malformed(path, format!("empty sentence for {id:?}")));
        }
        entries.push(Entry { id, sentence });
    }
    Ok(entries)
}

/// A JSON object read as an ordered list of pairs. Duplicate keys are an
/// error instead of silently keeping the last value.
struct OrderedEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object mapping identifiers to sentences")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut seen: HashSet<String> = HashSet::new();
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(key) = map.next_key::<String>()? {
                    if !seen.insert(key.clone()) {
                        return Err(de::Error::custom(format!("duplicate identifier {key:?}")));
                    }
                    let value: String = map.next_value()?;
                    pairs.push((key, value));
                }
                Ok(OrderedEntries(pairs))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
