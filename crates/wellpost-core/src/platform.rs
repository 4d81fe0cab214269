use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnsupportedPlatformError;

/// Target social network. The set is closed: there is no default or fallback
/// platform, and any other value is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
    Linkedin,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Instagram, Platform::Facebook, Platform::Linkedin];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Linkedin => "linkedin",
        }
    }

    /// Capitalized display name used in email subjects and prompts.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Linkedin => "Linkedin",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Platform::Instagram => 0,
            Platform::Facebook => 1,
            Platform::Linkedin => 2,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = UnsupportedPlatformError;

    /// Exact, case-sensitive match against the lowercase platform names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instagram" => Ok(Platform::Instagram),
            "facebook" => Ok(Platform::Facebook),
            "linkedin" => Ok(Platform::Linkedin),
            other => Err(UnsupportedPlatformError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_supported_platform() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>(), Ok(platform));
        }
    }

    #[test]
    fn rejects_unknown_platform() {
        let err = "tiktok".parse::<Platform>().unwrap_err();
        assert_eq!(err, UnsupportedPlatformError("tiktok".to_string()));
        assert!(err.to_string().contains("unsupported platform"));
    }

    #[test]
    fn rejects_wrong_case_and_whitespace() {
        assert!("Instagram".parse::<Platform>().is_err());
        assert!(" linkedin".parse::<Platform>().is_err());
        assert!("".parse::<Platform>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Platform::Linkedin).expect("serialize");
        assert_eq!(json, "\"linkedin\"");
        let parsed: Platform = serde_json::from_str("\"facebook\"").expect("deserialize");
        assert_eq!(parsed, Platform::Facebook);
    }

    #[test]
    fn indexes_are_distinct() {
        let mut seen: Vec<usize> = Platform::ALL.iter().map(|p| p.index()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    }
}
