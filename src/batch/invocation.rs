use std::process::Command;

use crate::textutil::shell_quote;

use super::job::TranslationJob;

/// How the external translator is called, shared by every entry of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslatorSettings {
    pub program: String,
    /// Pass `-b` (brief mode: translation only, no dictionary block).
    pub brief: bool,
    pub extra_args: Vec<String>,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_TRANSLATOR.to_string(),
            brief: false,
            extra_args: Vec::new(),
        }
    }
}

pub const DEFAULT_TRANSLATOR: &str = "trans";

/// One translator call as a program plus argument list. The sentence is a
/// single argument and never passes through a shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn for_sentence(settings: &TranslatorSettings, job: &TranslationJob, sentence: &str) -> Self {
        let mut args = vec![
            job.lang_pair(),
            sentence.to_string(),
            "-no-ansi".to_string(),
            format!("-engine={}", job.engine()),
        ];
        if settings.brief {
            args.push("-b".to_string());
        }
        args.extend(settings.extra_args.iter().cloned());
        Self {
            program: settings.program.clone(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// A copy-pasteable POSIX shell line. Display only.
    pub fn to_shell_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> TranslationJob {
        TranslationJob::new("en", "es", "google", Vec::new()).expect("job")
    }

    #[test]
    fn builds_translate_shell_arguments() {
        let inv = Invocation::for_sentence(&TranslatorSettings::default(), &job(), "hello world");
        assert_eq!(inv.program(), "trans");
        assert_eq!(inv.args(), ["en:es", "hello world", "-no-ansi", "-engine=google"]);
        assert_eq!(
            inv.to_shell_line(),
            "trans en:es 'hello world' -no-ansi -engine=google"
        );
    }

    #[test]
    fn brief_and_extra_args_follow_the_engine() {
        let settings = TranslatorSettings {
            program: "/opt/bin/trans".to_string(),
            brief: true,
            extra_args: vec!["-no-autocorrect".to_string()],
        };
        let inv = Invocation::for_sentence(&settings, &job(), "hi");
        assert_eq!(
            inv.args(),
            ["en:es", "hi", "-no-ansi", "-engine=google", "-b", "-no-autocorrect"]
        );
        assert_eq!(
            inv.to_shell_line(),
            "/opt/bin/trans en:es hi -no-ansi -engine=google -b -no-autocorrect"
        );
    }

    #[test]
    fn sentence_with_metacharacters_stays_one_argument() {
        let sentence = r#"say "hi" \ then; echo pwned"#;
        let inv = Invocation::for_sentence(&TranslatorSettings::default(), &job(), sentence);
        assert_eq!(inv.args()[1], sentence);
        assert_eq!(
            inv.to_shell_line(),
            r#"trans en:es 'say "hi" \ then; echo pwned' -no-ansi -engine=google"#
        );

        let cmd = inv.to_command();
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args.len(), 4);
        assert_eq!(args[1], sentence);
    }
}
