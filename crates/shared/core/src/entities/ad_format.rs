use serde::{Deserialize, Serialize};
use std::fmt;

/// Creative format requested by the impression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdFormat {
    #[default]
    Banner,
    Video,
    Native,
    Audio,
}

impl AdFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdFormat::Banner => "banner",
            AdFormat::Video => "video",
            AdFormat::Native => "native",
            AdFormat::Audio => "audio",
        }
    }
}

impl fmt::Display for AdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creative dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdSize {
    pub width: u32,
    pub height: u32,
}

impl AdSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for AdSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Placement of the ad on the screen (OpenRTB `pos`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdPosition {
    #[default]
    Unknown,
    AboveFold,
    BelowFold,
    Header,
    Footer,
    Sidebar,
    Fullscreen,
}

impl AdPosition {
    /// Map the OpenRTB position enum; unlisted codes are `Unknown`
    pub fn from_openrtb(code: i64) -> Self {
        match code {
            1 => AdPosition::AboveFold,
            3 => AdPosition::BelowFold,
            4 => AdPosition::Header,
            5 => AdPosition::Footer,
            6 => AdPosition::Sidebar,
            7 => AdPosition::Fullscreen,
            _ => AdPosition::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ad_size_display() {
        assert_eq!(AdSize::new(300, 250).to_string(), "300x250");
    }

    #[test]
    fn test_position_mapping() {
        assert_eq!(AdPosition::from_openrtb(1), AdPosition::AboveFold);
        assert_eq!(AdPosition::from_openrtb(2), AdPosition::Unknown);
        assert_eq!(AdPosition::from_openrtb(7), AdPosition::Fullscreen);
    }
}
