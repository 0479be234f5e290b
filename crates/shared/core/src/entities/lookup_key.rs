use super::{AdFormat, ClassifiedRequest, DeviceType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of a slice of performance data
///
/// Immutable value type with structural equality and hashing. The two
/// optional dimensions are the most specific ones and are the first to be
/// dropped when data is sparse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LookupKey {
    country: String,
    device_type: DeviceType,
    ad_format: AdFormat,
    ad_size: Option<String>,
    publisher_id: Option<String>,
}

impl LookupKey {
    pub fn new(
        country: impl Into<String>,
        device_type: DeviceType,
        ad_format: AdFormat,
        ad_size: Option<String>,
        publisher_id: Option<String>,
    ) -> Self {
        Self {
            country: country.into(),
            device_type,
            ad_format,
            ad_size: ad_size.filter(|s| !s.is_empty()),
            publisher_id: publisher_id.filter(|p| !p.is_empty()),
        }
    }

    /// Derive the exact key for a classified request
    ///
    /// Auto-generated publisher ids never have history, so they are left out.
    pub fn from_request(request: &ClassifiedRequest) -> Self {
        let publisher_id = if request.generated_ids.publisher_id {
            None
        } else {
            Some(request.publisher_id.clone())
        };

        Self::new(
            request.country.clone(),
            request.device_type,
            request.ad_format,
            request.primary_ad_size().map(|size| size.to_string()),
            publisher_id,
        )
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn ad_format(&self) -> AdFormat {
        self.ad_format
    }

    pub fn ad_size(&self) -> Option<&str> {
        self.ad_size.as_deref()
    }

    pub fn publisher_id(&self) -> Option<&str> {
        self.publisher_id.as_deref()
    }

    /// Same key with the ad size dimension removed
    pub fn without_ad_size(&self) -> Self {
        Self {
            ad_size: None,
            ..self.clone()
        }
    }

    /// Same key with the publisher dimension removed
    pub fn without_publisher(&self) -> Self {
        Self {
            publisher_id: None,
            ..self.clone()
        }
    }

    /// Ordered fallback chain, most specific first
    ///
    /// exact -> without ad size -> without publisher -> without both.
    /// Levels identical to an earlier one are skipped, so every entry is
    /// strictly broader than the one before and the chain always starts
    /// with `self`.
    pub fn fallback_keys(&self) -> Vec<LookupKey> {
        let candidates = [
            self.clone(),
            self.without_ad_size(),
            self.without_publisher(),
            self.without_ad_size().without_publisher(),
        ];

        let mut keys: Vec<LookupKey> = Vec::with_capacity(candidates.len());
        for key in candidates {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.country,
            self.device_type,
            self.ad_format,
            self.ad_size.as_deref().unwrap_or("*"),
            self.publisher_id.as_deref().unwrap_or("*")
        )
    }
}
