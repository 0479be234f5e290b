//! Diversity categories

use bidroute_core::{AdFormat, ClassifiedRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PREMIUM: &str = "premium";
pub const MID_TIER: &str = "mid_tier";
pub const VIDEO_SPECIALIST: &str = "video_specialist";
pub const NATIVE: &str = "native";

/// Category -> member bidders
///
/// A bidder listed under several categories belongs to the first one in
/// alphabetical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidderCategories(BTreeMap<String, Vec<String>>);

impl Default for BidderCategories {
    fn default() -> Self {
        let table: [(&str, &[&str]); 4] = [
            (PREMIUM, &["rubicon", "appnexus", "pubmatic", "openx", "ix"]),
            (
                MID_TIER,
                &["sovrn", "medianet", "gumgum", "yieldmo", "33across", "smartadserver"],
            ),
            (
                VIDEO_SPECIALIST,
                &["spotx", "beachfront", "unruly", "telaria", "freewheel"],
            ),
            (NATIVE, &["triplelift", "sharethrough", "teads"]),
        ];

        Self(
            table
                .iter()
                .map(|(category, bidders)| {
                    (
                        category.to_string(),
                        bidders.iter().map(|b| b.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

impl BidderCategories {
    pub fn new(table: BTreeMap<String, Vec<String>>) -> Self {
        Self(table)
    }

    pub fn category_of(&self, bidder_code: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, bidders)| bidders.iter().any(|b| b == bidder_code))
            .map(|(category, _)| category.as_str())
    }
}

/// Categories every selection for this request should cover
///
/// Premium and mid-tier always; video and native specialists only for
/// their formats. Limited to the configured categories.
pub fn required_categories<'a>(
    request: &ClassifiedRequest,
    configured: &'a [String],
) -> Vec<&'a str> {
    let mut wanted = vec![PREMIUM, MID_TIER];
    match request.ad_format {
        AdFormat::Video => wanted.push(VIDEO_SPECIALIST),
        AdFormat::Native => wanted.push(NATIVE),
        _ => {}
    }

    wanted
        .into_iter()
        .filter_map(|category| {
            configured
                .iter()
                .find(|c| c.as_str() == category)
                .map(String::as_str)
        })
        .collect()
}
