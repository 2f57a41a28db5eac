//! Filename metadata codec
//!
//! Generated assets persist their metadata only in the filename. The encoder
//! writes the current canonical form `<prompt>_<N>.<ext>`; the decoder must
//! keep accepting every form earlier releases wrote, so pre-existing asset
//! libraries keep resolving:
//!
//! 1. `"<prompt> <N>"`: suffix numbered, prompt may contain spaces
//! 2. `"<N> <prompt>"`: prefix numbered (oldest releases)
//! 3. `"<prompt>_<N>_<timestamp>"`: underscore numbered; the canonical
//!    form decodes here too, with the timestamp segment absent
//! 4. `"<prompt>_<ISO-like-timestamp>"`: timestamped, no number
//! 5. fallback: entire basename becomes the prompt
//!
//! Patterns are tried in that fixed order; first match wins.

/// Extensions recognized as sound assets (checked case-insensitively)
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aif", "aiff", "m4a", "ogg", "flac"];

/// Extension the encoder writes
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Metadata recovered from an asset filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedName {
    /// Lower-cased prompt with underscores rendered as spaces
    pub prompt_text: String,
    /// 0 when no number was recovered
    pub variant_number: u32,
    /// Verbatim timestamp token, empty when the name carries none
    pub timestamp: String,
}

/// Split `filename` into (stem, extension) when the extension is on the
/// audio allow-list; `None` marks the file as not a sound asset.
pub fn split_audio_extension(filename: &str) -> Option<(&str, &str)> {
    let (stem, ext) = filename.rsplit_once('.')?;
    let ext_lower = ext.to_lowercase();
    if stem.is_empty() || !AUDIO_EXTENSIONS.contains(&ext_lower.as_str()) {
        return None;
    }
    Some((stem, ext))
}

/// Lower-case, render underscores as spaces, collapse runs of whitespace
pub fn normalize_prompt(raw: &str) -> String {
    raw.to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Mutual substring containment used to group near-duplicate prompts.
///
/// Intentionally fuzzy: "rain" and "rain on car roof" count as the same
/// numbering family. Both the numbering assigner and the free-text search
/// share this helper so the fuzziness stays consistent.
pub fn bidirectional_contains(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn is_digit_run(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// ISO-like check: starts with `YYYY-MM-DD`
fn looks_like_timestamp(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(|b| b.is_ascii_digit())
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(|b| b.is_ascii_digit())
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(|b| b.is_ascii_digit())
}

fn parse_variant(digits: &str) -> u32 {
    // Absurdly long digit runs are treated as no number rather than a panic
    digits.parse().unwrap_or(0)
}

/// Decode an asset filename into structured metadata.
///
/// Returns `None` only for files whose extension is not on the audio
/// allow-list; every audio filename decodes, via the fallback if nothing
/// structured matches.
pub fn decode(filename: &str) -> Option<DecodedName> {
    let (stem, _ext) = split_audio_extension(filename)?;

    // 1. Suffix form: "<prompt> <N>"
    if let Some((prompt, digits)) = stem.rsplit_once(' ') {
        if is_digit_run(digits) && !prompt.trim().is_empty() {
            return Some(DecodedName {
                prompt_text: normalize_prompt(prompt),
                variant_number: parse_variant(digits),
                timestamp: String::new(),
            });
        }
    }

    // 2. Prefix form: "<N> <prompt>"
    if let Some((digits, prompt)) = stem.split_once(' ') {
        if is_digit_run(digits) && !prompt.trim().is_empty() {
            return Some(DecodedName {
                prompt_text: normalize_prompt(prompt),
                variant_number: parse_variant(digits),
                timestamp: String::new(),
            });
        }
    }

    // 3. Underscore numbered: "<prompt>_<N>_<timestamp>", timestamp optional
    //    (the canonical encoded form is "<prompt>_<N>"). Timestamps are
    //    never bare digit runs, so a trailing digit run always reads as the
    //    variant number; prompts ending in digits would otherwise lose
    //    their tail to the timestamp slot.
    if let Some((head, last)) = stem.rsplit_once('_') {
        if is_digit_run(last) && !head.is_empty() {
            return Some(DecodedName {
                prompt_text: normalize_prompt(head),
                variant_number: parse_variant(last),
                timestamp: String::new(),
            });
        }
        if let Some((prompt, digits)) = head.rsplit_once('_') {
            if is_digit_run(digits) && !prompt.is_empty() {
                return Some(DecodedName {
                    prompt_text: normalize_prompt(prompt),
                    variant_number: parse_variant(digits),
                    timestamp: last.to_string(),
                });
            }
        }
    }

    // 4. Legacy timestamped form, no number: "<prompt>_<ISO-like>"
    if let Some((head, last)) = stem.rsplit_once('_') {
        if looks_like_timestamp(last) && !head.is_empty() {
            return Some(DecodedName {
                prompt_text: normalize_prompt(head),
                variant_number: 0,
                timestamp: last.to_string(),
            });
        }
    }

    // 5. Fallback: whole basename is the prompt
    let timestamp = stem
        .rsplit_once('_')
        .map(|(_, last)| last.to_string())
        .unwrap_or_default();
    Some(DecodedName {
        prompt_text: normalize_prompt(stem),
        variant_number: 0,
        timestamp,
    })
}

/// Strip characters outside the filename-safe subset, lower-case, collapse
/// whitespace
pub fn sanitize_prompt(prompt: &str) -> String {
    let kept: String = prompt
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    normalize_prompt(&kept)
}

/// Produce the canonical filename for a prompt and variant number
pub fn encode(prompt_text: &str, variant_number: u32) -> String {
    let sanitized = sanitize_prompt(prompt_text);
    format!(
        "{}_{}.{}",
        sanitized.replace(' ', "_"),
        variant_number,
        DEFAULT_EXTENSION
    )
}
