//! Revising an existing post and suggesting improvements to it.

use std::sync::Arc;

use serde::Deserialize;
use wellpost_core::Platform;

use crate::backend::TextBackend;
use crate::error::BackendError;

pub const EDIT_TEMPERATURE: f32 = 0.5;
pub const MAX_SUGGESTIONS: usize = 3;

/// Numbered-list markers are detected within this many leading characters.
const MARKER_WINDOW: usize = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct EditRequest {
    pub original_body: String,
    pub instruction: String,
    pub platform: Platform,
}

#[derive(Clone)]
pub struct PostEditingService {
    backend: Arc<dyn TextBackend>,
}

impl PostEditingService {
    #[must_use]
    pub fn new(backend: Arc<dyn TextBackend>) -> Self {
        Self { backend }
    }

    /// Returns the backend's revision verbatim. Subject lines are not
    /// re-parsed; callers edit the body only.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure unchanged.
    pub async fn edit_post(&self, request: &EditRequest) -> Result<String, BackendError> {
        tracing::info!(platform = %request.platform, "editing post");
        let system = edit_prompt(request);
        let user = format!("Edit the post: {}", request.instruction);
        self.backend.invoke(&system, &user, EDIT_TEMPERATURE).await
    }

    /// At most [`MAX_SUGGESTIONS`] suggestions, fewer if the reply has fewer
    /// numbered lines.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure unchanged.
    pub async fn suggest_improvements(
        &self,
        body: &str,
        platform: Platform,
    ) -> Result<Vec<String>, BackendError> {
        tracing::info!(%platform, "requesting improvement suggestions");
        let reply = self
            .backend
            .invoke(
                &suggestion_prompt(body, platform),
                "Suggest improvements",
                EDIT_TEMPERATURE,
            )
            .await?;
        let suggestions = parse_suggestions(&reply);
        tracing::debug!(%platform, count = suggestions.len(), "suggestions parsed");
        Ok(suggestions)
    }
}

fn edit_prompt(request: &EditRequest) -> String {
    format!(
        "You are a holistic homeopathic doctor editing a {platform} post.

Original post: {body}

User wants: {instruction}

Modify the post maintaining the voice of a compassionate, scientific, and hopeful holistic doctor.
Focus on natural healing, mind-body balance, and emotional wellness.
Keep tone poetic yet factual, spiritually uplifting, and empowering.
Ensure content promotes harmony, nature, and vegetarian/vegan healing.

Return only the edited post.",
        platform = request.platform,
        body = request.original_body,
        instruction = request.instruction,
    )
}

fn suggestion_prompt(body: &str, platform: Platform) -> String {
    format!(
        "As a holistic homeopathic doctor, analyze this {platform} post and suggest 3 improvements:

Post: {body}

Focus on enhancing:
- Compassionate, scientific, hopeful voice
- Natural healing and mind-body balance elements
- Poetic yet factual tone
- Spiritual upliftment and empowerment

Return 3 numbered suggestions."
    )
}

/// Keeps non-blank lines with a digit among their first three characters
/// (untrimmed), trimmed, first three only.
///
/// This is a loose heuristic: "10 ways" matches and "- one" does not.
/// Non-ASCII digits count too, so "١." and "①" mark a suggestion.
#[must_use]
pub fn parse_suggestions(reply: &str) -> Vec<String> {
    reply
        .split('\n')
        .filter(|line| {
            !line.trim().is_empty() && line.chars().take(MARKER_WINDOW).any(is_digit_char)
        })
        .map(|line| line.trim().to_string())
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Code points of the `0` in each run of ten decimal digits (`Nd`).
const DECIMAL_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
    0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// Inclusive ranges of digits that are not decimal: superscripts,
/// subscripts, circled and parenthesized forms of 0-9.
const OTHER_DIGITS: &[(u32, u32)] = &[
    (0x00B2, 0x00B3),
    (0x00B9, 0x00B9),
    (0x1369, 0x1371),
    (0x19DA, 0x19DA),
    (0x2070, 0x2070),
    (0x2074, 0x2079),
    (0x2080, 0x2089),
    (0x2460, 0x2468),
    (0x2474, 0x247C),
    (0x2488, 0x2490),
    (0x24EA, 0x24EA),
    (0x24F5, 0x24FD),
    (0x24FF, 0x24FF),
    (0x2776, 0x277E),
    (0x2780, 0x2788),
    (0x278A, 0x2792),
    (0x10A40, 0x10A43),
    (0x10E60, 0x10E68),
    (0x11052, 0x1105A),
    (0x1F100, 0x1F10C),
];

/// Unicode decimal or digit character. Fractions, Roman numerals, numbers
/// above nine such as `⑩`, and CJK numerals do not count.
fn is_digit_char(c: char) -> bool {
    if c.is_ascii_digit() {
        return true;
    }
    if !c.is_numeric() {
        return false;
    }
    let cp = u32::from(c);
    DECIMAL_ZEROS.iter().any(|&zero| (zero..zero + 10).contains(&cp))
        || OTHER_DIGITS
            .iter()
            .any(|&(start, end)| (start..=end).contains(&cp))
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;
