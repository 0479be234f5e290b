//! Component score formulas
//!
//! Every function returns a value in [0, 100].

/// Score for a missing or meaningless input
pub const NEUTRAL_SCORE: f64 = 50.0;

/// 20% win rate maps to 100
pub fn win_rate_score(win_rate: f64) -> f64 {
    clamp_score(win_rate * 500.0)
}

/// 80% bid rate maps to 100
pub fn bid_rate_score(bid_rate: f64) -> f64 {
    clamp_score(bid_rate * 125.0)
}

/// Average CPM, relative to the floor when there is one
///
/// Without a floor 5.0 CPM maps to 100. With a floor, bidding exactly at
/// the floor scores 50, below it falls linearly to 0, and above it rises
/// 100 points per floor-multiple.
pub fn cpm_score(avg_cpm: f64, floor: Option<f64>) -> f64 {
    match floor.filter(|f| *f > 0.0) {
        None => clamp_score(avg_cpm * 20.0),
        Some(floor) if avg_cpm < floor => clamp_score(50.0 * avg_cpm / floor),
        Some(floor) => clamp_score(50.0 + 100.0 * (avg_cpm - floor) / floor),
    }
}

pub fn floor_clearance_score(clearance_rate: f64) -> f64 {
    clamp_score(clearance_rate * 100.0)
}

/// 100 up to 100 ms p95, 0 from 500 ms, linear in between
pub fn latency_score(p95_latency_ms: f64) -> f64 {
    if p95_latency_ms <= 100.0 {
        100.0
    } else if p95_latency_ms >= 500.0 {
        0.0
    } else {
        clamp_score(100.0 - (p95_latency_ms - 100.0) / 4.0)
    }
}

/// Recent-vs-historical win-rate trend
///
/// Neutral until the recent window has `min_samples` requests. The trend
/// is clamped to [0.5, 2.0], so halving scores 25 and doubling scores 100.
pub fn recency_score(
    recent_win_rate: f64,
    historical_win_rate: f64,
    recent_samples: u64,
    min_samples: u64,
) -> f64 {
    if recent_samples < min_samples {
        return NEUTRAL_SCORE;
    }

    let trend = if historical_win_rate > 0.0 {
        recent_win_rate / historical_win_rate
    } else if recent_win_rate > 0.0 {
        2.0
    } else {
        1.0
    };
    clamp_score(50.0 * trend.clamp(0.5, 2.0))
}

/// Share of the bidder's preferred id types present on the request
pub fn id_match_score<'a>(
    preferred: &[String],
    available: impl IntoIterator<Item = &'a str>,
) -> f64 {
    if preferred.is_empty() {
        return NEUTRAL_SCORE;
    }
    let available: Vec<&str> = available.into_iter().collect();
    if available.is_empty() {
        return 0.0;
    }

    let matched = preferred
        .iter()
        .filter(|id_type| available.contains(&id_type.as_str()))
        .count();
    clamp_score(100.0 * matched as f64 / preferred.len() as f64)
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}
