//! Per-platform prompt profiles.
//!
//! A [`PromptTemplateRegistry`] holds exactly one [`PlatformProfile`] per
//! [`Platform`]. Length and hashtag bounds are advisory: they are rendered into
//! prompt text and never enforced on generated output.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::UnsupportedPlatformError;
use crate::{ConfigError, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatStyle {
    VisualStorytelling,
    Conversational,
    Professional,
}

/// Structural outline of a post: opening hook, body sections, hashtags,
/// and call to action. A subject line always leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTemplate {
    pub opening: String,
    pub sections: Vec<String>,
    #[serde(default)]
    pub hashtag_qualifier: Option<String>,
    pub closing: String,
    pub tone: String,
}

impl PostTemplate {
    /// Ordered format bullet lines for the prompt.
    #[must_use]
    pub fn format_lines(&self, hashtag_limit: u32) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.sections.len() + 4);
        lines.push("Subject Line: Create a compelling subject line (5-8 words)".to_string());
        lines.push(self.opening.clone());
        lines.extend(self.sections.iter().cloned());
        lines.push(match self.hashtag_qualifier.as_deref() {
            Some(q) if !q.trim().is_empty() => format!("Up to {hashtag_limit} {q} hashtags"),
            _ => format!("Up to {hashtag_limit} hashtags"),
        });
        lines.push(self.closing.clone());
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub platform: Platform,
    pub max_length: u32,
    pub hashtag_limit: u32,
    pub style: FormatStyle,
    pub template: PostTemplate,
}

#[derive(Debug, Deserialize)]
pub struct ProfilesFile {
    pub profiles: Vec<PlatformProfile>,
}

/// Immutable lookup table from platform to profile.
#[derive(Debug, Clone)]
pub struct PromptTemplateRegistry {
    profiles: [PlatformProfile; 3],
}

impl PromptTemplateRegistry {
    /// The built-in profiles.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            profiles: [instagram_profile(), facebook_profile(), linkedin_profile()],
        }
    }

    /// Uses the YAML file at `path` when given, otherwise the built-in profiles.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Load and validate profiles from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfilesFileIo {
            path: path.display().to_string(),
            source: e,
        })?;

        let file: ProfilesFile = serde_yaml::from_str(&content)?;
        Self::from_profiles(file.profiles)
    }

    /// Build a registry, requiring exactly one profile per platform.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on duplicate or missing platforms,
    /// a zero `max_length`, or an empty tone/opening.
    pub fn from_profiles(profiles: Vec<PlatformProfile>) -> Result<Self, ConfigError> {
        let mut slots: [Option<PlatformProfile>; 3] = [None, None, None];

        for profile in profiles {
            validate_profile(&profile)?;
            let slot = &mut slots[profile.platform.index()];
            if slot.is_some() {
                return Err(ConfigError::Validation(format!(
                    "duplicate profile for platform '{}'",
                    profile.platform
                )));
            }
            *slot = Some(profile);
        }

        let missing: Vec<&str> = Platform::ALL
            .iter()
            .filter(|p| slots[p.index()].is_none())
            .map(|p| p.as_str())
            .collect();

        let [Some(instagram), Some(facebook), Some(linkedin)] = slots else {
            return Err(ConfigError::Validation(format!(
                "missing profile for platform(s): {}",
                missing.join(", ")
            )));
        };

        Ok(Self {
            profiles: [instagram, facebook, linkedin],
        })
    }

    #[must_use]
    pub fn profile_for(&self, platform: Platform) -> &PlatformProfile {
        &self.profiles[platform.index()]
    }

    /// Look up a profile by raw platform name.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedPlatformError`] for names outside the supported set.
    pub fn profile_for_name(&self, name: &str) -> Result<&PlatformProfile, UnsupportedPlatformError> {
        let platform: Platform = name.parse()?;
        Ok(self.profile_for(platform))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformProfile> {
        self.profiles.iter()
    }
}

impl Default for PromptTemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_profile(profile: &PlatformProfile) -> Result<(), ConfigError> {
    if profile.max_length == 0 {
        return Err(ConfigError::Validation(format!(
            "profile '{}' must have max_length > 0",
            profile.platform
        )));
    }
    if profile.template.tone.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "profile '{}' has an empty tone",
            profile.platform
        )));
    }
    if profile.template.opening.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "profile '{}' has an empty opening",
            profile.platform
        )));
    }
    Ok(())
}

fn instagram_profile() -> PlatformProfile {
    PlatformProfile {
        platform: Platform::Instagram,
        max_length: 2200,
        hashtag_limit: 30,
        style: FormatStyle::VisualStorytelling,
        template: PostTemplate {
            opening: "Poetic opening that connects to nature".to_string(),
            sections: vec!["3-4 gentle healing insights with emojis".to_string()],
            hashtag_qualifier: Some("relevant".to_string()),
            closing: "Empowering call to action".to_string(),
            tone: "warm, wise, awakening".to_string(),
        },
    }
}

fn facebook_profile() -> PlatformProfile {
    PlatformProfile {
        platform: Platform::Facebook,
        max_length: 63_206,
        hashtag_limit: 10,
        style: FormatStyle::Conversational,
        template: PostTemplate {
            opening: "Gentle, wise opening that connects to nature".to_string(),
            sections: vec![
                "Detailed healing wisdom (2-3 paragraphs)".to_string(),
                "Personal healing story or insight".to_string(),
            ],
            hashtag_qualifier: None,
            closing: "Empowering question for community".to_string(),
            tone: "compassionate, scientific".to_string(),
        },
    }
}

fn linkedin_profile() -> PlatformProfile {
    PlatformProfile {
        platform: Platform::Linkedin,
        max_length: 3000,
        hashtag_limit: 5,
        style: FormatStyle::Professional,
        template: PostTemplate {
            opening: "Professional yet poetic opening".to_string(),
            sections: vec![
                "Evidence-based healing wisdom".to_string(),
                "Integration with modern wellness".to_string(),
            ],
            hashtag_qualifier: Some("professional".to_string()),
            closing: "Thought-provoking, empowering conclusion".to_string(),
            tone: "scientific yet spiritual".to_string(),
        },
    }
}

#[cfg(test)]
#[path = "profiles_test.rs"]
mod tests;
