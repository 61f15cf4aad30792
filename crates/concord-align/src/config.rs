//! Alignment configuration.

use crate::error::AlignError;
use crate::pair::AlignedSeries;
use crate::series::Series;

/// How to treat input series whose timestamps are not ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderPolicy {
    /// Stable-sort both series by timestamp before matching (default).
    #[default]
    Sort,
    /// Reject out-of-order input with [`AlignError::UnsortedTimestamp`].
    Strict,
}

/// Which candidate wins when two are equally far from a reference timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Prefer the earlier candidate ("nearest, ties go left"; default).
    #[default]
    EarlierWins,
    /// Prefer the later candidate.
    LaterWins,
}

/// Search procedure used to locate each reference sample's nearest candidate.
///
/// Both strategies produce identical pairs; they differ only in cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Single merge-style pass with two advancing cursors, O(n + m) (default).
    #[default]
    Sweep,
    /// Independent binary search per reference sample, O(n log m).
    BinarySearch,
}

/// Configuration for nearest-timestamp alignment.
///
/// Construct via [`AlignConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter      | Default                     |
/// |----------------|-----------------------------|
/// | `order_policy` | [`OrderPolicy::Sort`]       |
/// | `tie_break`    | [`TieBreak::EarlierWins`]   |
/// | `strategy`     | [`SearchStrategy::Sweep`]   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignConfig {
    pub(crate) order_policy: OrderPolicy,
    pub(crate) tie_break: TieBreak,
    pub(crate) strategy: SearchStrategy,
}

impl AlignConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how out-of-order input is handled.
    #[must_use]
    pub fn with_order_policy(mut self, order_policy: OrderPolicy) -> Self {
        self.order_policy = order_policy;
        self
    }

    /// Set the equidistant tie-break rule.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Set the search strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Return the ordering policy.
    #[must_use]
    pub fn order_policy(&self) -> OrderPolicy {
        self.order_policy
    }

    /// Return the tie-break rule.
    #[must_use]
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Return the search strategy.
    #[must_use]
    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Align `reference` against `candidate` using this configuration.
    ///
    /// See [`align`](crate::align) for the matching rule.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignError::EmptySeries`] | Either series is empty |
    /// | [`AlignError::UnsortedTimestamp`] | [`OrderPolicy::Strict`] and a series is out of order |
    pub fn align(&self, reference: &Series, candidate: &Series) -> Result<AlignedSeries, AlignError> {
        crate::align::align_with(self, reference, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AlignConfig::new();
        assert_eq!(cfg.order_policy(), OrderPolicy::Sort);
        assert_eq!(cfg.tie_break(), TieBreak::EarlierWins);
        assert_eq!(cfg.strategy(), SearchStrategy::Sweep);
    }

    #[test]
    fn builder_overrides() {
        let cfg = AlignConfig::new()
            .with_order_policy(OrderPolicy::Strict)
            .with_tie_break(TieBreak::LaterWins)
            .with_strategy(SearchStrategy::BinarySearch);
        assert_eq!(cfg.order_policy(), OrderPolicy::Strict);
        assert_eq!(cfg.tie_break(), TieBreak::LaterWins);
        assert_eq!(cfg.strategy(), SearchStrategy::BinarySearch);
    }
}
