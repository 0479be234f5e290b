use bidroute_classifier::{BidRequest, RequestClassifier, TcfConsentParser};
use bidroute_clock::ManualClock;
use bidroute_core::{AdFormat, DeviceType, LookupKey};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

fn classifier() -> RequestClassifier {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 8, 21, 15, 0).unwrap());
    RequestClassifier::new(clock, Arc::new(TcfConsentParser::new()))
}

#[test]
fn test_pre_26_request_with_ext_fields() {
    let _ = env_logger::try_init();

    let json = r#"{
        "id": "legacy-1",
        "imp": [{"id": "1", "tagid": "sidebar", "banner": {"w": 160, "h": 600}}],
        "site": {"id": "s-9", "domain": "blog.example.org", "publisher": {"id": "pub-9"}},
        "device": {"ua": "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Safari/604.1"},
        "user": {
            "geo": {"country": "DE"},
            "ext": {
                "consent": "CPXxRfAPXxRfAAfKABENB-CgAAAAAAAAAAYgAAAAAAAA",
                "eids": [{"source": "id5-sync.com", "uids": [{"id": "id5-abc"}]}]
            }
        },
        "regs": {"ext": {"gdpr": 1}}
    }"#;

    let request = classifier().classify(&BidRequest::from_json_lossy(json));

    assert_eq!(request.request_id, "legacy-1");
    assert_eq!(request.ad_format, AdFormat::Banner);
    assert_eq!(request.ad_sizes.len(), 1);
    assert_eq!(request.ad_sizes[0].to_string(), "160x600");
    assert_eq!(request.device_type, DeviceType::Tablet);
    assert_eq!(request.country, "DE");
    assert_eq!(request.ad_unit_id, "sidebar");
    assert!(request.has_user_id("id5"));
    assert!(request.consent.gdpr_applies);
    assert!(request.consent.tcf_consent.is_some());
    // 2024-06-08 is a Saturday
    assert_eq!(request.day_of_week, 5);
    assert_eq!(request.hour_of_day, 21);

    let key = LookupKey::from_request(&request);
    assert_eq!(key.to_string(), "DE|tablet|banner|160x600|pub-9");
}

#[test]
fn test_generated_publisher_is_not_a_lookup_dimension() {
    let json = r#"{"id": "anon", "imp": [{"id": "1", "video": {"w": 640, "h": 360}}]}"#;

    let request = classifier().classify(&BidRequest::from_json_lossy(json));

    assert!(request.generated_ids.publisher_id);
    assert!(request.publisher_id.starts_with("pub_"));
    assert_eq!(request.ad_format, AdFormat::Video);
    assert_eq!(request.country, "UNKNOWN");

    let key = LookupKey::from_request(&request);
    assert_eq!(key.publisher_id(), None);
    assert_eq!(key.to_string(), "UNKNOWN|desktop|video|640x360|*");
    assert_eq!(key.fallback_keys().len(), 2);
}

#[test]
fn test_malformed_request_still_classifies() {
    let request = classifier().classify(&BidRequest::from_json_lossy("{\"imp\": 42"));

    assert!(!request.request_id.is_empty());
    assert_eq!(request.ad_format, AdFormat::Banner);
    assert_eq!(request.device_type, DeviceType::Desktop);
    assert!(request.ad_sizes.is_empty());
}
