//! OpenRTB 2.x input model
//!
//! Only the fields the classifier consumes are modelled. Every struct is
//! `#[serde(default)]` so absent objects and fields deserialize to empty
//! values instead of failing.

use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BidRequest {
    pub id: String,
    pub imp: Vec<Imp>,
    pub site: Option<Site>,
    pub app: Option<App>,
    pub device: Option<Device>,
    pub user: Option<User>,
    pub regs: Option<Regs>,
}

impl BidRequest {
    /// Parse a request, degrading to an empty request on malformed JSON
    pub fn from_json_lossy(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            warn!("[CLASSIFY] Malformed bid request, using defaults: {}", e);
            BidRequest::default()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Imp {
    pub id: String,
    pub tagid: Option<String>,
    pub banner: Option<Banner>,
    pub video: Option<Video>,
    pub native: Option<Native>,
    pub audio: Option<Audio>,
    pub bidfloor: Option<f64>,
    pub bidfloorcur: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Banner {
    pub format: Vec<Format>,
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub pos: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Format {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub mimes: Vec<String>,
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub pos: Option<i64>,
}

impl Video {
    /// An empty `video: {}` placeholder does not count
    pub fn is_populated(&self) -> bool {
        !self.mimes.is_empty() || self.w.is_some() || self.h.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Native {
    pub request: Option<String>,
    pub ver: Option<String>,
}

impl Native {
    pub fn is_populated(&self) -> bool {
        self.request.as_deref().is_some_and(|r| !r.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Audio {
    pub mimes: Vec<String>,
}

impl Audio {
    pub fn is_populated(&self) -> bool {
        !self.mimes.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    pub id: Option<String>,
    pub domain: Option<String>,
    pub page: Option<String>,
    pub cat: Vec<String>,
    pub pagecat: Vec<String>,
    pub publisher: Option<Publisher>,
    pub content: Option<Content>,
    pub ext: Option<SiteExt>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteExt {
    pub data: Option<SiteExtData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteExtData {
    pub pagetype: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct App {
    pub id: Option<String>,
    pub bundle: Option<String>,
    pub domain: Option<String>,
    pub cat: Vec<String>,
    pub publisher: Option<Publisher>,
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Publisher {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    pub cat: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    pub ua: Option<String>,
    pub devicetype: Option<i64>,
    pub os: Option<String>,
    pub connectiontype: Option<i64>,
    pub geo: Option<Geo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geo {
    pub country: Option<String>,
    pub region: Option<String>,
    pub metro: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: Option<String>,
    pub buyeruid: Option<String>,
    pub consent: Option<String>,
    pub geo: Option<Geo>,
    pub eids: Vec<Eid>,
    pub ext: Option<UserExt>,
}

/// Pre-2.6 location of consent and extended ids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserExt {
    pub consent: Option<String>,
    pub eids: Vec<Eid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Eid {
    pub source: String,
    pub uids: Vec<Uid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Uid {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Regs {
    pub coppa: Option<i64>,
    pub gdpr: Option<i64>,
    pub us_privacy: Option<String>,
    pub gpp: Option<String>,
    pub gpp_sid: Vec<u32>,
    pub ext: Option<RegsExt>,
}

/// Pre-2.6 location of the privacy flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegsExt {
    pub gdpr: Option<i64>,
    pub us_privacy: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_request_deserializes() {
        let request: BidRequest =
            serde_json::from_str(r#"{"id":"r1","imp":[{"id":"1","banner":{}}]}"#).unwrap();

        assert_eq!(request.id, "r1");
        assert_eq!(request.imp.len(), 1);
        assert!(request.imp[0].banner.is_some());
        assert!(request.imp[0].video.is_none());
        assert!(request.device.is_none());
    }

    #[test]
    fn test_malformed_json_degrades_to_default() {
        let request = BidRequest::from_json_lossy("{not json");
        assert_eq!(request, BidRequest::default());
    }
}
