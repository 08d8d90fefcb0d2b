//! Trait definitions for comparison strategies.

/// Strategy trait for determining if two hashes are near-duplicates
pub trait ComparisonStrategy: Send + Sync {
    /// Determine if two photos should be considered duplicates based on distance
    fn is_duplicate(&self, distance: u32) -> bool;

    /// Human-readable description of the strategy
    fn description(&self) -> String;
}

/// Simple threshold-based comparison strategy
#[derive(Debug, Clone)]
pub struct ThresholdStrategy {
    /// Maximum Hamming distance (inclusive) to consider as duplicate
    threshold: u32,
}

impl ThresholdStrategy {
    /// Create a new threshold strategy
    ///
    /// For 64-bit pHash:
    /// - 0: identical hashes only
    /// - 5: near-identical shots (default)
    /// - 10: permissive, catches re-encodes and light edits
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn is_duplicate(&self, distance: u32) -> bool {
        distance <= self.threshold
    }

    fn description(&self) -> String {
        format!(
            "Threshold strategy: photos with distance <= {} are considered duplicates",
            self.threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_strategy_at_boundary() {
        let strategy = ThresholdStrategy::new(5);

        assert!(strategy.is_duplicate(4));
        assert!(strategy.is_duplicate(5));
        assert!(!strategy.is_duplicate(6));
    }

    #[test]
    fn zero_threshold_accepts_only_identical() {
        let strategy = ThresholdStrategy::new(0);

        assert!(strategy.is_duplicate(0));
        assert!(!strategy.is_duplicate(1));
    }

    #[test]
    fn default_threshold_is_five() {
        let strategy = ThresholdStrategy::default();

        assert!(strategy.is_duplicate(5));
        assert!(!strategy.is_duplicate(6));
    }

    #[test]
    fn description_includes_threshold() {
        let strategy = ThresholdStrategy::new(7);
        assert!(strategy.description().contains('7'));
    }
}
