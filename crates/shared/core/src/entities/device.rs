use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse device class used for lookup keys and scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[default]
    Desktop,
    Mobile,
    Tablet,
    Ctv,
}

impl DeviceType {
    /// Map the OpenRTB `devicetype` enum
    ///
    /// Returns `None` for codes that carry no usable signal so the caller
    /// can fall through to user-agent parsing.
    pub fn from_openrtb(code: i64) -> Option<Self> {
        match code {
            1 | 4 => Some(DeviceType::Mobile),
            2 => Some(DeviceType::Desktop),
            3 | 6 | 7 => Some(DeviceType::Ctv),
            5 => Some(DeviceType::Tablet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Ctv => "ctv",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network connection class (OpenRTB `connectiontype`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    #[default]
    Unknown,
    Ethernet,
    Wifi,
    CellularUnknown,
    Cellular2g,
    Cellular3g,
    Cellular4g,
    Cellular5g,
}

impl ConnectionType {
    pub fn from_openrtb(code: i64) -> Self {
        match code {
            1 => ConnectionType::Ethernet,
            2 => ConnectionType::Wifi,
            3 => ConnectionType::CellularUnknown,
            4 => ConnectionType::Cellular2g,
            5 => ConnectionType::Cellular3g,
            6 => ConnectionType::Cellular4g,
            7 => ConnectionType::Cellular5g,
            _ => ConnectionType::Unknown,
        }
    }
}
