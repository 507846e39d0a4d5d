//! Text clean-up applied before a line is spoken.

use std::sync::LazyLock;

use regex::Regex;

static ABBREVIATIONS: LazyLock<[(Regex, &'static str); 4]> = LazyLock::new(|| {
    [
        (word(r"AI"), "artificial intelligence"),
        (word(r"API"), "A P I"),
        (word(r"TTS"), "text to speech"),
        (word(r"STT"), "speech to text"),
    ]
});

static PUNCT_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.,;:])\s+").expect("static regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

fn word(abbr: &str) -> Regex {
    Regex::new(&format!(r"\b{abbr}\b")).expect("static regex")
}

/// Expand abbreviations a speech engine would spell out and normalize
/// spacing so pauses land where the punctuation is.
pub fn prepare_for_speech(text: &str) -> String {
    let mut out = WHITESPACE.replace_all(text.trim(), " ").into_owned();
    for (pattern, spoken) in ABBREVIATIONS.iter() {
        out = pattern.replace_all(&out, *spoken).into_owned();
    }
    PUNCT_SPACING.replace_all(&out, "$1 ").into_owned()
}
