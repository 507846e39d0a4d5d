//! Spoken narration of focus session transitions.
//!
//! The session itself never speaks. The runner maps each event to a short
//! English line with [`message_for`] and hands it to a [`Narrator`]. Narrators
//! are fire-and-forget: a failure is logged by the caller and never reaches
//! session state. At most one utterance is active at a time; a new line
//! preempts the previous one.

mod command;
mod messages;
mod speech;
mod voice;

pub use command::CommandNarrator;
pub use messages::{message_for, minutes_phrase};
pub use speech::prepare_for_speech;
pub use voice::{select_preferred_voice, VoiceCriteria, VoiceInfo};

use crate::error::NarrationError;

/// Something that can say short lines out loud.
pub trait Narrator: Send + Sync {
    /// Start saying `text`. Must not block until the utterance finishes.
    fn speak(&self, text: &str) -> Result<(), NarrationError>;

    /// Stop the current utterance, if any.
    fn cancel(&self) {}
}

/// Writes narration to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn speak(&self, text: &str) -> Result<(), NarrationError> {
        tracing::info!(target: "studyflow::narration", "{text}");
        Ok(())
    }
}

/// Prints narration lines to stderr, leaving stdout to event output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNarrator;

impl Narrator for ConsoleNarrator {
    fn speak(&self, text: &str) -> Result<(), NarrationError> {
        eprintln!("🔊 {}", prepare_for_speech(text));
        Ok(())
    }
}

/// Accepts everything and says nothing. Used when narration is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&self, _text: &str) -> Result<(), NarrationError> {
        Ok(())
    }
}
