//! Narration through an external text-to-speech program.

use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use super::{prepare_for_speech, Narrator};
use crate::error::NarrationError;

/// Speaks by spawning a TTS program (`espeak`, `say`, `spd-say`, ...).
///
/// `{text}` and `{voice}` in the argument list are substituted per
/// utterance; an argument that ends up empty is dropped. Only one child runs
/// at a time: speaking again or cancelling kills the previous one.
#[derive(Debug)]
pub struct CommandNarrator {
    program: String,
    args: Vec<String>,
    voice: Option<String>,
    current: Mutex<Option<Child>>,
}

impl CommandNarrator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            voice: None,
            current: Mutex::new(None),
        }
    }

    pub fn with_voice(mut self, voice: Option<String>) -> Self {
        self.voice = voice;
        self
    }

    /// Arguments for one utterance.
    pub fn render_args(&self, text: &str) -> Vec<String> {
        let voice = self.voice.as_deref().unwrap_or("");
        self.args
            .iter()
            .map(|a| a.replace("{text}", text).replace("{voice}", voice))
            .filter(|a| !a.is_empty())
            .collect()
    }

    fn stop_current(&self) {
        let child = match self.current.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(mut child) = child {
            // Already exited is fine; reap either way.
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Narrator for CommandNarrator {
    fn speak(&self, text: &str) -> Result<(), NarrationError> {
        self.stop_current();
        let line = prepare_for_speech(text);
        let child = Command::new(&self.program)
            .args(self.render_args(&line))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    NarrationError::Unavailable(format!("'{}' not found", self.program))
                }
                _ => NarrationError::Process(e),
            })?;

        let mut guard = self
            .current
            .lock()
            .map_err(|_| NarrationError::Unavailable("narrator state poisoned".into()))?;
        *guard = Some(child);
        Ok(())
    }

    fn cancel(&self) {
        self.stop_current();
    }
}

impl Drop for CommandNarrator {
    fn drop(&mut self) {
        self.stop_current();
    }
}
