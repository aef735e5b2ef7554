use std::io::{self, Write};
use std::time::Instant;

/// Timestamped status lines on stderr. Stdout is left alone so the binary can
/// be piped without mixing diagnostics into data.
pub struct ConsoleProgress {
    enabled: bool,
    t0: Instant,
}

impl ConsoleProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            t0: Instant::now(),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.emit("", msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.emit("WARN ", msg.as_ref());
    }

    /// One line per finished entry; failures go out at WARN level.
    pub fn entry(&self, current: usize, total: usize, id: &str, status: EntryStatus<'_>) {
        let level = match status {
            EntryStatus::Failed(_) => "WARN ",
            _ => "",
        };
        self.emit(level, &entry_line(current, total, id, status));
    }

    fn emit(&self, level: &str, msg: &str) {
        if !self.enabled {
            return;
        }
        let ts = fmt_elapsed(self.t0.elapsed().as_secs_f64());
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{ts}] {level}{msg}");
    }
}

/// How an entry ended, as far as the console is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryStatus<'a> {
    Translated,
    /// Dry-run: the command line was stored instead of run.
    Planned,
    Failed(&'a str),
}

fn entry_line(current: usize, total: usize, id: &str, status: EntryStatus<'_>) -> String {
    let total = total.max(1);
    let current = current.min(total);
    let width = total.to_string().len();
    let pct = (current as f64 / total as f64) * 100.0;
    let what = match status {
        EntryStatus::Translated => "translated".to_string(),
        EntryStatus::Planned => "planned".to_string(),
        EntryStatus::Failed(reason) => format!("failed: {reason}"),
    };
    format!("[{current:>width$}/{total} {pct:5.1}%] {id} {what}")
}

fn fmt_elapsed(seconds: f64) -> String {
    let seconds = seconds.max(0.0) as u64;
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::{entry_line, fmt_elapsed, EntryStatus};

    #[test]
    fn elapsed_switches_to_hours_past_one_hour() {
        assert_eq!(fmt_elapsed(0.0), "00:00");
        assert_eq!(fmt_elapsed(61.9), "01:01");
        assert_eq!(fmt_elapsed(3600.0), "01:00:00");
        assert_eq!(fmt_elapsed(-5.0), "00:00");
    }

    #[test]
    fn entry_lines_pad_the_counter_to_the_total() {
        assert_eq!(
            entry_line(3, 12, "a3", EntryStatus::Translated),
            "[ 3/12  25.0%] a3 translated"
        );
        assert_eq!(
            entry_line(1, 1, "a1", EntryStatus::Planned),
            "[1/1 100.0%] a1 planned"
        );
        assert_eq!(
            entry_line(2, 2, "a2", EntryStatus::Failed("exit status 1")),
            "[2/2 100.0%] a2 failed: exit status 1"
        );
    }

    #[test]
    fn entry_line_survives_an_empty_job() {
        assert_eq!(entry_line(0, 0, "x", EntryStatus::Translated), "[0/1   0.0%] x translated");
    }
}
