use serde::{Deserialize, Serialize};
use std::fmt;

/// Cross-platform frameworks the classifier can recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkId {
    React,
    Flutter,
    Cordova,
}

impl FrameworkId {
    pub fn all() -> &'static [FrameworkId] {
        &[Self::React, Self::Flutter, Self::Cordova]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::Flutter => "flutter",
            Self::Cordova => "cordova",
        }
    }

    /// Name used in human-readable reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::React => "React",
            Self::Flutter => "Flutter",
            Self::Cordova => "Cordova-like",
        }
    }
}

impl fmt::Display for FrameworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final verdict for a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformLabel {
    React,
    Flutter,
    Cordova,
    Unknown,
}

impl PlatformLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::Flutter => "flutter",
            Self::Cordova => "cordova",
            Self::Unknown => "unknown",
        }
    }

    /// Upper-cased label, with native apps reported as "PROBABLY NATIVE"
    pub fn headline(&self) -> String {
        match self {
            Self::Unknown => "PROBABLY NATIVE".to_string(),
            other => other.as_str().to_uppercase(),
        }
    }
}

impl From<FrameworkId> for PlatformLabel {
    fn from(id: FrameworkId) -> Self {
        match id {
            FrameworkId::React => Self::React,
            FrameworkId::Flutter => Self::Flutter,
            FrameworkId::Cordova => Self::Cordova,
        }
    }
}

impl fmt::Display for PlatformLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline() {
        assert_eq!(PlatformLabel::Flutter.headline(), "FLUTTER");
        assert_eq!(PlatformLabel::Unknown.headline(), "PROBABLY NATIVE");
    }

    #[test]
    fn test_label_from_framework() {
        for id in FrameworkId::all() {
            assert_eq!(PlatformLabel::from(*id).as_str(), id.as_str());
        }
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&FrameworkId::Cordova).unwrap(), "\"cordova\"");
        assert_eq!(serde_json::to_string(&PlatformLabel::Unknown).unwrap(), "\"unknown\"");
    }
}
