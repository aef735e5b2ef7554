use std::process::Stdio;

use crate::error::InvocationError;
use crate::textutil::{decode_utf8_lossy, strip_ansi, truncate_chars};

use super::invocation::Invocation;

/// Runs one invocation and returns the translated text.
pub trait Translator {
    fn translate(&mut self, invocation: &Invocation) -> Result<String, InvocationError>;
}

/// Spawns the external translator and blocks until it exits.
pub struct ProcessTranslator {
    stderr_max_chars: usize,
}

impl ProcessTranslator {
    pub fn new(stderr_max_chars: usize) -> Self {
        Self { stderr_max_chars }
    }
}

impl Default for ProcessTranslator {
    fn default() -> Self {
        Self::new(240)
    }
}

impl Translator for ProcessTranslator {
    fn translate(&mut self, invocation: &Invocation) -> Result<String, InvocationError> {
        let output = invocation
            .to_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|source| InvocationError::Spawn {
                program: invocation.program().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = decode_utf8_lossy(&output.stderr);
            let stderr = strip_ansi(stderr.trim());
            return Err(InvocationError::Status {
                code: output.status.code(),
                stderr: truncate_chars(&stderr, self.stderr_max_chars),
            });
        }

        Ok(strip_ansi(&decode_utf8_lossy(&output.stdout)))
    }
}
