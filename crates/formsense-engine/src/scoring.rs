//! Weighted score aggregation and temporal smoothing.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use crate::exercise::FormCriterion;

/// Importance at or above which a criterion can veto a rep
pub const CRITICAL_IMPORTANCE: f64 = 0.9;

/// Below this score a critical criterion counts as a safety failure
pub const CRITICAL_FAILURE_SCORE: f64 = 0.3;

/// Minimum aggregate score for a frame to qualify as good form
pub const GOOD_REP_THRESHOLD: f64 = 0.7;

/// Capacity of the rolling score-smoothing window
pub const SMOOTHING_WINDOW: usize = 5;

/// Aggregate result for one frame's criteria
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseScore {
    /// Instantaneous weighted score in [0, 1]
    pub overall: f64,
    /// Per-criterion raw scores keyed by criterion kind
    pub criterion_scores: HashMap<String, f64>,
    /// Descriptions of criteria that failed critically this frame
    pub critical_failures: Vec<String>,
    /// Whether this frame's form qualifies toward a good rep
    pub is_good_rep: bool,
}

impl PhaseScore {
    /// Neutral score for frames with nothing to evaluate
    pub fn empty() -> Self {
        Self {
            overall: 0.0,
            criterion_scores: HashMap::new(),
            critical_failures: Vec::new(),
            is_good_rep: false,
        }
    }
}

/// Combine per-criterion scores into one weighted aggregate. Weights need
/// not sum to 1; the total is normalized by the summed importance. A
/// critical failure vetoes `is_good_rep` regardless of the aggregate.
pub fn aggregate(results: &[(&FormCriterion, f64)]) -> PhaseScore {
    let mut total = 0.0;
    let mut total_weight = 0.0;
    let mut criterion_scores = HashMap::new();
    let mut critical_failures = Vec::new();

    for (criterion, score) in results {
        total += score * criterion.importance;
        total_weight += criterion.importance;
        criterion_scores.insert(criterion.kind.as_str().to_string(), *score);

        if criterion.importance >= CRITICAL_IMPORTANCE && *score < CRITICAL_FAILURE_SCORE {
            critical_failures.push(criterion.description.clone());
        }
    }

    // Guard against phases defining no criteria or all-zero weights
    let overall = if total_weight > 0.0 {
        (total / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let is_good_rep = overall >= GOOD_REP_THRESHOLD && critical_failures.is_empty();

    PhaseScore {
        overall,
        criterion_scores,
        critical_failures,
        is_good_rep,
    }
}

/// Bounded FIFO buffer of recent overall scores. The reported score is
/// the buffer mean, damping per-frame jitter from noisy pose estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBuffer {
    scores: VecDeque<f64>,
    capacity: usize,
}

impl ScoreBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            scores: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, score: f64) {
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn clear(&mut self) {
        self.scores.clear();
    }
}

impl Default for ScoreBuffer {
    fn default() -> Self {
        Self::new(SMOOTHING_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::CriterionKind;

    fn criterion(kind: CriterionKind, importance: f64) -> FormCriterion {
        FormCriterion {
            kind,
            description: format!("{} check", kind.as_str()),
            ideal_min: 0.0,
            ideal_max: 0.0,
            tolerance: 10.0,
            importance,
        }
    }

    #[test]
    fn test_weighted_mean_normalizes_by_total_weight() {
        let a = criterion(CriterionKind::KneeAlignment, 0.5);
        let b = criterion(CriterionKind::BackAngle, 0.25);
        let score = aggregate(&[(&a, 1.0), (&b, 0.4)]);
        // (1.0*0.5 + 0.4*0.25) / 0.75 = 0.8
        assert!((score.overall - 0.8).abs() < 1e-10);
    }

    #[test]
    fn test_zero_weight_guard() {
        let a = criterion(CriterionKind::KneeAlignment, 0.0);
        let score = aggregate(&[(&a, 1.0)]);
        assert_eq!(score.overall, 0.0);
        assert!(!score.is_good_rep);

        let score = aggregate(&[]);
        assert_eq!(score.overall, 0.0);
        assert!(score.overall.is_finite());
    }

    #[test]
    fn test_critical_failure_vetoes_good_rep() {
        // Four perfect criteria push the aggregate well past the good-rep
        // threshold, but the failing critical one must still veto it.
        let perfect = criterion(CriterionKind::HipHinge, 1.0);
        let critical = criterion(CriterionKind::BackAngle, 0.9);
        let score = aggregate(&[
            (&perfect, 1.0),
            (&perfect, 1.0),
            (&perfect, 1.0),
            (&perfect, 1.0),
            (&critical, 0.2),
        ]);

        assert!(score.overall > GOOD_REP_THRESHOLD);
        assert!(!score.is_good_rep);
        assert_eq!(score.critical_failures.len(), 1);
    }

    #[test]
    fn test_low_importance_failure_does_not_veto() {
        let good = criterion(CriterionKind::KneeAlignment, 1.0);
        let minor = criterion(CriterionKind::SmoothMotion, 0.3);
        let score = aggregate(&[(&good, 1.0), (&minor, 0.1)]);
        assert!(score.critical_failures.is_empty());
        assert!(score.is_good_rep);
    }

    #[test]
    fn test_overall_stays_in_unit_range() {
        let a = criterion(CriterionKind::KneeAlignment, 1.0);
        let score = aggregate(&[(&a, 1.0)]);
        assert!(score.overall <= 1.0 && score.overall >= 0.0);
    }

    #[test]
    fn test_smoothing_buffer_evicts_oldest() {
        let mut buffer = ScoreBuffer::new(SMOOTHING_WINDOW);
        for score in [0.1, 0.2, 0.3, 0.4, 0.5, 0.6] {
            buffer.push(score);
        }
        assert_eq!(buffer.len(), SMOOTHING_WINDOW);
        // Mean of the most recent five only: 0.2..=0.6
        assert!((buffer.mean() - 0.4).abs() < 1e-10);
    }

    #[test]
    fn test_empty_buffer_means_zero() {
        let buffer = ScoreBuffer::default();
        assert_eq!(buffer.mean(), 0.0);
    }
}
