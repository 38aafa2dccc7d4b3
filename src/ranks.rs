use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankDefinition {
    /// Minimum overall progress, in percent, needed to hold this rank.
    pub threshold: f64,
    pub name: String,
}

impl RankDefinition {
    pub fn new(threshold: f64, name: impl Into<String>) -> Self {
        Self {
            threshold,
            name: name.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RankTableError {
    #[error("rank table is empty")]
    Empty,
    #[error("lowest rank must start at 0%, got {0}")]
    NonZeroStart(f64),
    #[error("rank thresholds must be finite and strictly increasing (at '{name}')")]
    NotIncreasing { name: String },
}

/// Ordered rank tiers. Thresholds start at 0 and strictly increase, so
/// every progress value resolves to some rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankTable {
    ranks: Vec<RankDefinition>,
}

const DEFAULT_RANKS: [(f64, &str); 19] = [
    (0.0, "Recruit"),
    (50.0, "Spark"),
    (100.0, "Private"),
    (200.0, "Tactician"),
    (300.0, "Sapper"),
    (400.0, "Hardcore"),
    (500.0, "Sergeant"),
    (600.0, "Ranger"),
    (700.0, "Gladiator"),
    (800.0, "Barbarian"),
    (900.0, "Beast"),
    (1000.0, "Major"),
    (1250.0, "Vanguard"),
    (1500.0, "Colonel"),
    (2000.0, "Warlord"),
    (2500.0, "General"),
    (3500.0, "Titan"),
    (4500.0, "Legend"),
    (5000.0, "Mythic"),
];

impl Default for RankTable {
    fn default() -> Self {
        Self {
            ranks: DEFAULT_RANKS
                .iter()
                .map(|&(threshold, name)| RankDefinition::new(threshold, name))
                .collect(),
        }
    }
}

impl RankTable {
    pub fn new(ranks: Vec<RankDefinition>) -> Result<Self, RankTableError> {
        let first = ranks.first().ok_or(RankTableError::Empty)?;
        if first.threshold != 0.0 {
            return Err(RankTableError::NonZeroStart(first.threshold));
        }
        for pair in ranks.windows(2) {
            if !(pair[1].threshold.is_finite() && pair[1].threshold > pair[0].threshold) {
                return Err(RankTableError::NotIncreasing {
                    name: pair[1].name.clone(),
                });
            }
        }
        Ok(Self { ranks })
    }

    pub fn ranks(&self) -> &[RankDefinition] {
        &self.ranks
    }

    /// Highest rank whose threshold is at or below `progress`.
    pub fn current(&self, progress: f64) -> &RankDefinition {
        let progress = sanitize(progress);
        self.ranks
            .iter()
            .rev()
            .find(|rank| rank.threshold <= progress)
            .unwrap_or(&self.ranks[0])
    }

    /// Lowest rank whose threshold is strictly above `progress`, if any.
    pub fn next(&self, progress: f64) -> Option<&RankDefinition> {
        let progress = sanitize(progress);
        self.ranks.iter().find(|rank| rank.threshold > progress)
    }

    pub fn gap_to_next(&self, progress: f64) -> Option<f64> {
        self.next(progress)
            .map(|rank| rank.threshold - sanitize(progress))
    }

    /// Position of the current rank in the table.
    pub fn level(&self, progress: f64) -> usize {
        let progress = sanitize(progress);
        self.ranks
            .iter()
            .rposition(|rank| rank.threshold <= progress)
            .unwrap_or(0)
    }
}

fn sanitize(progress: f64) -> f64 {
    if progress.is_nan() { 0.0 } else { progress }
}
