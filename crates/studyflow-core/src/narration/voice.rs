//! Preferred voice selection.
//!
//! Which voices exist depends entirely on the host, so selection is a pure
//! query over whatever list the host reports. Finding nothing is normal; the
//! back-end then speaks with its default voice.

use serde::{Deserialize, Serialize};

/// A voice the host can speak with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    /// BCP 47-ish tag; `en-GB` and `en_GB` are treated alike.
    pub lang: String,
}

impl VoiceInfo {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// What a good voice looks like, most important first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCriteria {
    #[serde(default = "default_preferred_lang")]
    pub preferred_lang: String,
    #[serde(default = "default_fallback_lang")]
    pub fallback_lang: String,
    /// Language prefix accepted as a last resort.
    #[serde(default = "default_base_lang")]
    pub base_lang: String,
    /// Name fragments to favour (case-insensitive).
    #[serde(default)]
    pub preferred_names: Vec<String>,
    /// Name fragments that mark higher quality voices.
    #[serde(default = "default_quality_markers")]
    pub quality_markers: Vec<String>,
    /// Name fragments to avoid unless nothing else matches.
    #[serde(default)]
    pub excluded_names: Vec<String>,
}

fn default_preferred_lang() -> String {
    "en-GB".into()
}
fn default_fallback_lang() -> String {
    "en-US".into()
}
fn default_base_lang() -> String {
    "en".into()
}
fn default_quality_markers() -> Vec<String> {
    vec!["premium".into(), "enhanced".into(), "neural".into()]
}

impl Default for VoiceCriteria {
    fn default() -> Self {
        Self {
            preferred_lang: default_preferred_lang(),
            fallback_lang: default_fallback_lang(),
            base_lang: default_base_lang(),
            preferred_names: Vec::new(),
            quality_markers: default_quality_markers(),
            excluded_names: Vec::new(),
        }
    }
}

fn norm_lang(lang: &str) -> String {
    lang.trim().replace('_', "-").to_ascii_lowercase()
}

fn name_has_any(voice: &VoiceInfo, fragments: &[String]) -> bool {
    let name = voice.name.to_lowercase();
    fragments
        .iter()
        .any(|f| !f.is_empty() && name.contains(&f.to_lowercase()))
}

/// Pick the best voice for `criteria`, walking the tiers in order:
///
/// 1. preferred language with a preferred name
/// 2. preferred language with a quality marker
/// 3. any preferred language voice
/// 4. fallback language with a preferred name
/// 5. fallback language with a quality marker
/// 6. base language without an excluded name
/// 7. any base language voice
pub fn select_preferred_voice<'a>(
    voices: &'a [VoiceInfo],
    criteria: &VoiceCriteria,
) -> Option<&'a VoiceInfo> {
    let preferred = norm_lang(&criteria.preferred_lang);
    let fallback = norm_lang(&criteria.fallback_lang);
    let base = norm_lang(&criteria.base_lang);

    let is_preferred = |v: &VoiceInfo| norm_lang(&v.lang).contains(&preferred);
    let is_fallback = |v: &VoiceInfo| norm_lang(&v.lang).starts_with(&fallback);
    let is_base = |v: &VoiceInfo| norm_lang(&v.lang).starts_with(&base);

    let tiers: [&dyn Fn(&VoiceInfo) -> bool; 7] = [
        &|v: &VoiceInfo| is_preferred(v) && name_has_any(v, &criteria.preferred_names),
        &|v: &VoiceInfo| is_preferred(v) && name_has_any(v, &criteria.quality_markers),
        &|v: &VoiceInfo| is_preferred(v),
        &|v: &VoiceInfo| is_fallback(v) && name_has_any(v, &criteria.preferred_names),
        &|v: &VoiceInfo| is_fallback(v) && name_has_any(v, &criteria.quality_markers),
        &|v: &VoiceInfo| is_base(v) && !name_has_any(v, &criteria.excluded_names),
        &|v: &VoiceInfo| is_base(v),
    ];

    let chosen = tiers
        .iter()
        .find_map(|tier| voices.iter().find(|v| tier(v)));
    if let Some(voice) = chosen {
        tracing::debug!(name = %voice.name, lang = %voice.lang, "selected narration voice");
    }
    chosen
}
