use encoding_rs::UTF_8;
use once_cell::sync::Lazy;
use regex::Regex;

static ANSI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("ansi"));
static LANG_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:auto|[A-Za-z]{2,3}(?:-[A-Za-z0-9]{2,8})*)$").expect("lang code")
});

/// U+0301 COMBINING ACUTE ACCENT, used as a stress mark in Russian teaching texts.
pub const STRESS_MARK: char = '\u{0301}';

pub fn strip_ansi(text: &str) -> String {
    ANSI_RE.replace_all(text, "").into_owned()
}

/// Accepts `auto` and BCP-47-ish codes as understood by translate-shell
/// (`en`, `yue`, `zh-TW`, `sr-Latn`).
pub fn is_valid_lang_code(code: &str) -> bool {
    LANG_CODE_RE.is_match(code)
}

/// Decode bytes as UTF-8, dropping a leading BOM and replacing invalid sequences.
pub fn decode_utf8_lossy(bytes: &[u8]) -> String {
    let (text, _) = UTF_8.decode_with_bom_removal(bytes);
    text.into_owned()
}

/// Quote one argument for a POSIX shell. Arguments made only of characters
/// with no special meaning are returned bare.
pub fn shell_quote(arg: &str) -> String {
    if !arg.is_empty() && arg.chars().all(is_shell_safe) {
        return arg.to_string();
    }
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('\'');
    for ch in arg.chars() {
        if ch == '\'' {
            out.push_str(r"'\''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

fn is_shell_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(ch, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
}

/// Trim and fold line breaks into single spaces.
pub fn collapse_newlines(text: &str) -> String {
    text.trim().replace("\r\n", " ").replace('\n', " ")
}

/// Cut to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

pub fn strip_stress_marks(text: &str) -> String {
    text.chars().filter(|&c| c != STRESS_MARK).collect()
}

fn is_russian_letter(c: char) -> bool {
    matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

/// Lowercased Russian words only: every character that is not a Russian
/// letter (or, with `keep_stress`, a stress mark) is dropped, words left
/// empty disappear, and the rest are joined by single spaces.
pub fn russian_letters_only(text: &str, keep_stress: bool) -> String {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|&c| is_russian_letter(c) || (keep_stress && c == STRESS_MARK))
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
