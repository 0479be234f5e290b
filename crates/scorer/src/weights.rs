use crate::error::{Result, ScorerError};
use bidroute_core::{ScoreComponent, ScoreComponents};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Allowed deviation of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Relative importance of each score component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub win_rate: f64,
    pub bid_rate: f64,
    pub cpm: f64,
    pub floor_clearance: f64,
    pub latency: f64,
    pub recency: f64,
    pub id_match: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            win_rate: 0.25,
            bid_rate: 0.15,
            cpm: 0.20,
            floor_clearance: 0.10,
            latency: 0.10,
            recency: 0.10,
            id_match: 0.10,
        }
    }
}

impl ScoringWeights {
    /// Build from a component-name map, starting from the defaults
    ///
    /// Names are the snake_case component names (`win_rate`, `cpm`, ...).
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self> {
        let mut weights = Self::default();
        for (name, weight) in map {
            let component = ScoreComponent::ALL
                .into_iter()
                .find(|c| c.as_str() == name)
                .ok_or_else(|| ScorerError::UnknownComponent(name.clone()))?;
            *weights.get_mut(component) = *weight;
        }
        Ok(weights)
    }

    pub fn get(&self, component: ScoreComponent) -> f64 {
        match component {
            ScoreComponent::WinRate => self.win_rate,
            ScoreComponent::BidRate => self.bid_rate,
            ScoreComponent::Cpm => self.cpm,
            ScoreComponent::FloorClearance => self.floor_clearance,
            ScoreComponent::Latency => self.latency,
            ScoreComponent::Recency => self.recency,
            ScoreComponent::IdMatch => self.id_match,
        }
    }

    fn get_mut(&mut self, component: ScoreComponent) -> &mut f64 {
        match component {
            ScoreComponent::WinRate => &mut self.win_rate,
            ScoreComponent::BidRate => &mut self.bid_rate,
            ScoreComponent::Cpm => &mut self.cpm,
            ScoreComponent::FloorClearance => &mut self.floor_clearance,
            ScoreComponent::Latency => &mut self.latency,
            ScoreComponent::Recency => &mut self.recency,
            ScoreComponent::IdMatch => &mut self.id_match,
        }
    }

    pub fn sum(&self) -> f64 {
        ScoreComponent::ALL.into_iter().map(|c| self.get(c)).sum()
    }

    /// Each weight non-negative and the total within tolerance of 1.0
    pub fn validate(&self) -> Result<()> {
        for component in ScoreComponent::ALL {
            let weight = self.get(component);
            if weight < 0.0 || weight.is_nan() {
                return Err(ScorerError::NegativeWeight {
                    component: component.to_string(),
                    weight,
                });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScorerError::WeightSum { sum });
        }
        Ok(())
    }

    /// Weighted total of the components, clamped to [0, 100]
    pub fn combine(&self, components: &ScoreComponents) -> f64 {
        components
            .iter()
            .map(|(component, score)| self.get(component) * score)
            .sum::<f64>()
            .clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_valid() {
        let weights = ScoringWeights::default();
        assert!(weights.validate().is_ok());
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sum_outside_tolerance_rejected() {
        let weights = ScoringWeights {
            win_rate: 0.30,
            ..Default::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(ScorerError::WeightSum { .. })
        ));

        let weights = ScoringWeights {
            win_rate: 0.2505,
            ..Default::default()
        };
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected_even_when_sum_is_one() {
        let weights = ScoringWeights {
            win_rate: 0.30,
            bid_rate: -0.05,
            cpm: 0.35,
            ..Default::default()
        };
        assert!((weights.sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
        assert!(matches!(
            weights.validate(),
            Err(ScorerError::NegativeWeight { ref component, .. }) if component == "bid_rate"
        ));
    }

    #[test]
    fn test_from_map() {
        let map: HashMap<String, f64> = [("win_rate".to_string(), 0.35), ("cpm".to_string(), 0.10)]
            .into_iter()
            .collect();
        let weights = ScoringWeights::from_map(&map).unwrap();
        assert_eq!(weights.win_rate, 0.35);
        assert_eq!(weights.cpm, 0.10);
        assert_eq!(weights.bid_rate, 0.15);

        let map: HashMap<String, f64> = [("freshness".to_string(), 0.1)].into_iter().collect();
        assert_eq!(
            ScoringWeights::from_map(&map),
            Err(ScorerError::UnknownComponent("freshness".to_string()))
        );
    }

    #[test]
    fn test_combine() {
        let components = ScoreComponents {
            win_rate: 100.0,
            bid_rate: 100.0,
            cpm: 100.0,
            floor_clearance: 100.0,
            latency: 100.0,
            recency: 100.0,
            id_match: 100.0,
        };
        assert!((ScoringWeights::default().combine(&components) - 100.0).abs() < 1e-9);
        assert_eq!(ScoringWeights::default().combine(&ScoreComponents::default()), 0.0);
    }
}
