use super::{AdFormat, AdPosition, AdSize, ConnectionType, ConsentSnapshot, DeviceType, PageType};
use crate::values::{Cpm, Timestamp};
use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which identifiers were synthesized because the source request lacked them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedIds {
    pub publisher_id: bool,
    pub site_id: bool,
    pub ad_unit_id: bool,
}

/// Normalized auction features for one impression
///
/// Created fresh per incoming auction and discarded after the selection
/// decision. `ad_sizes` keeps the source order; the first entry is the
/// primary size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRequest {
    pub request_id: String,

    // Inventory
    pub ad_format: AdFormat,
    pub ad_sizes: Vec<AdSize>,
    pub position: AdPosition,

    // Device
    pub device_type: DeviceType,
    pub os: String,
    pub browser: String,
    pub connection_type: ConnectionType,

    // Geo
    pub country: String,
    pub region: String,
    pub dma: String,

    // Publisher
    pub publisher_id: String,
    pub site_id: String,
    pub ad_unit_id: String,
    pub domain: String,
    pub page_url: String,
    pub page_type: Option<PageType>,
    pub page_categories: Vec<String>,
    pub is_app: bool,

    // User
    /// Available identity types, id-type -> value
    pub user_ids: BTreeMap<String, String>,
    pub consent: ConsentSnapshot,

    // Pricing
    pub floor_price: Option<Cpm>,
    pub floor_currency: String,

    // Time
    pub timestamp: Timestamp,
    pub hour_of_day: u32,
    /// Days since Monday (0 = Monday)
    pub day_of_week: u32,

    pub generated_ids: GeneratedIds,
}

impl ClassifiedRequest {
    /// Create a request with default features at the given time
    ///
    /// Hour-of-day and day-of-week are derived here and nowhere else.
    pub fn at(timestamp: Timestamp) -> Self {
        Self {
            request_id: String::new(),
            ad_format: AdFormat::Banner,
            ad_sizes: Vec::new(),
            position: AdPosition::Unknown,
            device_type: DeviceType::Desktop,
            os: String::new(),
            browser: String::new(),
            connection_type: ConnectionType::Unknown,
            country: "UNKNOWN".to_string(),
            region: String::new(),
            dma: String::new(),
            publisher_id: String::new(),
            site_id: String::new(),
            ad_unit_id: String::new(),
            domain: String::new(),
            page_url: String::new(),
            page_type: None,
            page_categories: Vec::new(),
            is_app: false,
            user_ids: BTreeMap::new(),
            consent: ConsentSnapshot::default(),
            floor_price: None,
            floor_currency: "USD".to_string(),
            timestamp,
            hour_of_day: timestamp.hour(),
            day_of_week: timestamp.weekday().num_days_from_monday(),
            generated_ids: GeneratedIds::default(),
        }
    }

    /// First declared size, if any
    pub fn primary_ad_size(&self) -> Option<&AdSize> {
        self.ad_sizes.first()
    }

    /// Floor price when one is set and positive
    pub fn effective_floor(&self) -> Option<Cpm> {
        self.floor_price.filter(|floor| *floor > Decimal::ZERO)
    }

    pub fn has_user_id(&self, id_type: &str) -> bool {
        self.user_ids.contains_key(id_type)
    }
}
