use crate::categories::required_categories;
use crate::config::SelectorConfig;
use crate::error::Result;
use bidroute_core::{
    BidderCode, BidderScore, ClassifiedRequest, SelectedBidder, SelectionReason, SelectionResult,
};
use bidroute_ports::{AnchorProvider, DEFAULT_ANCHORS};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;

/// Chooses which candidates are invited to an auction
///
/// The selector owns its random source. Random draws happen in a fixed
/// order (step 2 coin flips in score order, then one step 4 sample), so two
/// selectors with the same seed make the same choices for the same input.
pub struct PartnerSelector {
    config: SelectorConfig,
    anchors: Option<Arc<dyn AnchorProvider>>,
    rng: StdRng,
}

impl PartnerSelector {
    /// Selector seeded from OS entropy
    pub fn new(config: SelectorConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Selector with a fixed seed for reproducible selection
    pub fn with_seed(config: SelectorConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SelectorConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        info!(
            "[SELECTOR] max {} bidders, bypass {}, shadow {}, diversity {}",
            config.max_bidders, config.bypass_enabled, config.shadow_mode, config.diversity_enabled
        );
        Ok(Self {
            config,
            anchors: None,
            rng,
        })
    }

    /// Use revenue-ranked anchors instead of the built-in defaults
    pub fn with_anchor_provider(mut self, provider: Arc<dyn AnchorProvider>) -> Self {
        self.anchors = Some(provider);
        self
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Selector with the same configuration and anchors but its own random
    /// source, for one request
    pub fn fork(&self, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config: self.config.clone(),
            anchors: self.anchors.clone(),
            rng,
        }
    }

    /// Select partners for one request
    ///
    /// Never fails: an empty candidate list yields an empty result.
    pub async fn select_partners(
        &mut self,
        scores: &[BidderScore],
        request: &ClassifiedRequest,
    ) -> SelectionResult {
        if self.config.bypass_enabled {
            return self.bypass(scores);
        }

        let normal = self.select_normal(scores, request).await;
        if self.config.shadow_mode {
            return self.shadow(scores, normal);
        }
        normal
    }

    fn bypass(&self, scores: &[BidderScore]) -> SelectionResult {
        debug!("[SELECTOR] Bypass: selecting all {} candidates", scores.len());
        SelectionResult {
            selected: scores
                .iter()
                .map(|score| self.entry(score, SelectionReason::Bypass))
                .collect(),
            excluded: Vec::new(),
            total_candidates: scores.len(),
            bypass_mode: true,
            shadow_mode: false,
            shadow_would_exclude: Vec::new(),
        }
    }

    fn shadow(&self, scores: &[BidderScore], normal: SelectionResult) -> SelectionResult {
        let mut selected = normal.selected;
        for code in &normal.excluded {
            if let Some(score) = scores.iter().find(|s| &s.bidder_code == code) {
                selected.push(self.entry(score, SelectionReason::Bypass));
            }
        }

        debug!(
            "[SELECTOR] Shadow: would exclude {} of {}",
            normal.excluded.len(),
            scores.len()
        );
        SelectionResult {
            selected,
            excluded: Vec::new(),
            total_candidates: scores.len(),
            bypass_mode: false,
            shadow_mode: true,
            shadow_would_exclude: normal.excluded,
        }
    }

    async fn select_normal(
        &mut self,
        scores: &[BidderScore],
        request: &ClassifiedRequest,
    ) -> SelectionResult {
        let cap = self.config.max_bidders;
        let mut ranked: Vec<&BidderScore> = scores.iter().collect();
        ranked.sort_by(|a, b| b.cmp_by_score(a));

        let mut selected: Vec<SelectedBidder> = Vec::new();
        let mut chosen: HashSet<&str> = HashSet::new();

        // 1. Anchors, regardless of score
        if !scores.is_empty() {
            let anchors = self.anchor_bidders(&request.publisher_id).await;
            for anchor in anchors.iter().take(self.config.anchor_bidder_count) {
                if selected.len() >= cap {
                    break;
                }
                if let Some(score) = ranked.iter().find(|s| &s.bidder_code == anchor)
                    && chosen.insert(score.bidder_code.as_str())
                {
                    selected.push(self.entry(score, SelectionReason::Anchor));
                }
            }
        }

        // 2. High scorers, low confidence ones by coin flip
        for score in &ranked {
            if selected.len() >= cap {
                break;
            }
            if chosen.contains(score.bidder_code.as_str())
                || score.total_score < self.config.min_score_threshold
            {
                continue;
            }

            let reason = if score.confidence < self.config.low_confidence_threshold {
                if self.rng.r#gen::<f64>() >= self.config.exploration_rate {
                    continue;
                }
                SelectionReason::Exploration
            } else {
                SelectionReason::HighScore
            };
            chosen.insert(score.bidder_code.as_str());
            selected.push(self.entry(score, reason));
        }

        // 3. One bidder per unrepresented category
        if self.config.diversity_enabled {
            for category in required_categories(request, &self.config.diversity_categories) {
                if selected.len() >= cap {
                    break;
                }
                if selected
                    .iter()
                    .any(|s| s.category.as_deref() == Some(category))
                {
                    continue;
                }
                let best = ranked.iter().find(|s| {
                    !chosen.contains(s.bidder_code.as_str())
                        && self.config.categories.category_of(&s.bidder_code) == Some(category)
                });
                if let Some(score) = best {
                    chosen.insert(score.bidder_code.as_str());
                    selected.push(self.entry(score, SelectionReason::Diversity));
                }
            }
        }

        // 4. Exploration slots, sampled once
        let room = cap.saturating_sub(selected.len());
        let pool: Vec<&BidderScore> = ranked
            .iter()
            .copied()
            .filter(|s| {
                !chosen.contains(s.bidder_code.as_str())
                    && s.confidence < self.config.exploration_confidence_threshold
            })
            .collect();
        let draws = self.config.exploration_slots.min(room).min(pool.len());
        if draws > 0 {
            let picks: Vec<&BidderScore> = pool
                .choose_multiple(&mut self.rng, draws)
                .copied()
                .collect();
            for score in picks {
                chosen.insert(score.bidder_code.as_str());
                selected.push(self.entry(score, SelectionReason::ExplorationSlot));
            }
        }

        let excluded: Vec<BidderCode> = scores
            .iter()
            .filter(|s| !chosen.contains(s.bidder_code.as_str()))
            .map(|s| s.bidder_code.clone())
            .collect();

        debug!(
            "[SELECTOR] Selected {} of {} ({} excluded)",
            selected.len(),
            scores.len(),
            excluded.len()
        );

        SelectionResult {
            selected,
            excluded,
            total_candidates: scores.len(),
            bypass_mode: false,
            shadow_mode: false,
            shadow_would_exclude: Vec::new(),
        }
    }

    async fn anchor_bidders(&self, publisher_id: &str) -> Vec<BidderCode> {
        let limit = self.config.anchor_bidder_count;
        let defaults = || -> Vec<BidderCode> { DEFAULT_ANCHORS.iter().map(|b| b.to_string()).collect() };

        let Some(provider) = &self.anchors else {
            return defaults();
        };
        match provider.top_bidders_by_revenue(publisher_id, limit).await {
            Ok(anchors) if !anchors.is_empty() => anchors,
            Ok(_) => defaults(),
            Err(e) => {
                warn!(
                    "[SELECTOR] Anchor lookup for {} failed, using defaults: {}",
                    publisher_id, e
                );
                defaults()
            }
        }
    }

    fn entry(&self, score: &BidderScore, reason: SelectionReason) -> SelectedBidder {
        SelectedBidder {
            bidder_code: score.bidder_code.clone(),
            score: score.total_score,
            confidence: score.confidence,
            reason,
            category: self
                .config
                .categories
                .category_of(&score.bidder_code)
                .map(str::to_string),
        }
    }
}
