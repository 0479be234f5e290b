use bidroute_core::{AdFormat, BidderScore, ClassifiedRequest, ScoreComponents, SelectionReason};
use bidroute_selector::{PartnerSelector, SelectorConfig};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const BIDDERS: [&str; 15] = [
    "rubicon",
    "appnexus",
    "pubmatic",
    "openx",
    "ix",
    "sovrn",
    "medianet",
    "gumgum",
    "yieldmo",
    "spotx",
    "beachfront",
    "triplelift",
    "sharethrough",
    "smallbidder",
    "newbidder",
];

fn score(code: &str, total: f64, confidence: f64) -> BidderScore {
    BidderScore {
        bidder_code: code.to_string(),
        total_score: total,
        components: ScoreComponents::default(),
        confidence,
        lookup_key_used: None,
        fallback_level: 0,
    }
}

/// Fifteen candidates with random scores and confidences
fn random_scores(seed: u64) -> Vec<BidderScore> {
    let mut rng = StdRng::seed_from_u64(seed);
    BIDDERS
        .iter()
        .map(|code| score(code, rng.gen_range(0.0..100.0), rng.gen_range(0.0..1.0)))
        .collect()
}

fn request(format: AdFormat) -> ClassifiedRequest {
    let mut request = ClassifiedRequest::at(Utc::now());
    request.publisher_id = "pub-1".to_string();
    request.ad_format = format;
    request
}

#[tokio::test]
async fn test_anchors_always_selected() {
    let _ = env_logger::try_init();

    // Anchors get the worst scores and no confidence
    let mut scores: Vec<BidderScore> = BIDDERS[3..]
        .iter()
        .map(|code| score(code, 80.0, 0.9))
        .collect();
    for anchor in ["rubicon", "appnexus", "pubmatic"] {
        scores.push(score(anchor, 0.5, 0.0));
    }
    assert_eq!(scores.len(), 15);

    let config = SelectorConfig {
        max_bidders: 10,
        anchor_bidder_count: 3,
        ..Default::default()
    };
    let mut selector = PartnerSelector::with_seed(config, 42).unwrap();
    let result = selector.select_partners(&scores, &request(AdFormat::Banner)).await;

    for anchor in ["rubicon", "appnexus", "pubmatic"] {
        assert_eq!(result.reason_for(anchor), Some(SelectionReason::Anchor));
    }
    assert!(result.selected.len() <= 10);
}

#[tokio::test]
async fn test_normal_mode_partitions_candidates() {
    let _ = env_logger::try_init();

    for seed in 0..50 {
        let scores = random_scores(seed);
        let format = if seed % 3 == 0 {
            AdFormat::Video
        } else {
            AdFormat::Banner
        };
        let config = SelectorConfig {
            max_bidders: 3 + (seed as usize % 8),
            ..Default::default()
        };
        let max_bidders = config.max_bidders;
        let mut selector = PartnerSelector::with_seed(config, seed).unwrap();
        let result = selector.select_partners(&scores, &request(format)).await;

        assert!(result.selected.len() <= max_bidders, "seed {}", seed);

        let selected: HashSet<&str> = result.selected_bidder_codes().into_iter().collect();
        let excluded: HashSet<&str> = result.excluded.iter().map(String::as_str).collect();
        let candidates: HashSet<&str> = scores.iter().map(|s| s.bidder_code.as_str()).collect();

        assert_eq!(selected.len(), result.selected.len(), "duplicate selection");
        assert!(selected.is_disjoint(&excluded));
        let union: HashSet<&str> = selected.union(&excluded).copied().collect();
        assert_eq!(union, candidates);
        assert_eq!(result.total_candidates, scores.len());
    }
}

#[tokio::test]
async fn test_same_seed_same_selection() {
    for seed in [1, 7, 99, 12345] {
        let scores = random_scores(seed);
        let config = SelectorConfig {
            exploration_rate: 0.5,
            exploration_slots: 3,
            ..Default::default()
        };

        let mut first = PartnerSelector::with_seed(config.clone(), seed).unwrap();
        let mut second = PartnerSelector::with_seed(config, seed).unwrap();

        let a = first.select_partners(&scores, &request(AdFormat::Banner)).await;
        let b = second.select_partners(&scores, &request(AdFormat::Banner)).await;
        assert_eq!(a.selected_bidder_codes(), b.selected_bidder_codes());

        // The rng carries over, and stays in step across calls
        let a = first.select_partners(&scores, &request(AdFormat::Video)).await;
        let b = second.select_partners(&scores, &request(AdFormat::Video)).await;
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn test_bypass_mode_properties() {
    let scores = random_scores(3);
    let config = SelectorConfig {
        bypass_enabled: true,
        max_bidders: 2,
        ..Default::default()
    };
    let mut selector = PartnerSelector::with_seed(config, 3).unwrap();
    let result = selector.select_partners(&scores, &request(AdFormat::Banner)).await;

    assert_eq!(result.selected.len(), scores.len());
    assert!(result.excluded.is_empty());
    assert!(result.selected.iter().all(|s| s.reason == SelectionReason::Bypass));
}

#[tokio::test]
async fn test_shadow_matches_normal_exclusions() {
    for seed in 0..20 {
        let scores = random_scores(seed);
        let normal_config = SelectorConfig {
            max_bidders: 5,
            ..Default::default()
        };
        let shadow_config = SelectorConfig {
            shadow_mode: true,
            ..normal_config.clone()
        };

        let mut normal = PartnerSelector::with_seed(normal_config, seed).unwrap();
        let mut shadow = PartnerSelector::with_seed(shadow_config, seed).unwrap();

        let expected = normal.select_partners(&scores, &request(AdFormat::Banner)).await;
        let result = shadow.select_partners(&scores, &request(AdFormat::Banner)).await;

        assert_eq!(result.selected.len(), scores.len());
        assert!(result.excluded.is_empty());
        assert_eq!(result.shadow_would_exclude, expected.excluded);
        assert_eq!(
            result.shadow_would_exclude.is_empty(),
            expected.excluded.is_empty()
        );
    }
}
