//! @ai:module:intent Cumulative counters and on-demand rate computation
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricsAggregatorTrait
//! @ai:module:stateless false

use crate::dataset::Language;
use crate::metrics::types::{
    BenchmarkSummary, CounterSet, FunctionalCounters, FunctionalRates, IntegrationalCounters,
    IntegrationalRates, RateSummary, UnitCounters, UnitRates,
};
use std::collections::BTreeMap;

/// @ai:intent Trait for folding per-task contributions into running counters
pub trait MetricsAggregatorTrait {
    fn record_unit(&mut self, language: Language, contribution: UnitCounters);

    fn record_integrational(&mut self, language: Language, contribution: IntegrationalCounters);

    fn record_functional(&mut self, language: Language, contribution: FunctionalCounters);

    /// @ai:intent Count a task whose scoring completed, whatever it contributed
    fn mark_scored(&mut self);
}

/// @ai:intent Owns all category counters for one benchmark run.
///            Counters only ever grow; a fresh aggregator starts each run.
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    overall: CounterSet,
    by_language: BTreeMap<Language, CounterSet>,
    tasks_scored: u32,
}

impl MetricsAggregator {
    /// @ai:intent Create an aggregator with zeroed counters
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overall(&self) -> &CounterSet {
        &self.overall
    }

    /// @ai:intent Counters for one language, zero if nothing was recorded
    /// @ai:effects pure
    pub fn for_language(&self, language: Language) -> CounterSet {
        self.by_language.get(&language).copied().unwrap_or_default()
    }

    pub fn tasks_scored(&self) -> u32 {
        self.tasks_scored
    }

    /// @ai:intent Rates for a counter set, omitting zero-denominator categories
    /// @ai:effects pure
    pub fn rates(counters: &CounterSet) -> RateSummary {
        let unit = &counters.unit;
        let integrational = &counters.integrational;
        let functional = &counters.functional;

        let unit_rates = (unit.total > 0).then(|| UnitRates {
            executable: ratio(unit.executable, unit.total),
            mutation_detection: ratio(unit.mutated, unit.total),
            spam: ratio(unit.spammy, unit.total),
        });

        let integrational_rates = IntegrationalRates {
            correct_passed: checked_ratio(integrational.correct, integrational.total_correct),
            incorrect_failed: checked_ratio(integrational.incorrect, integrational.total_incorrect),
        };
        let integrational_rates = (integrational_rates.correct_passed.is_some()
            || integrational_rates.incorrect_failed.is_some())
        .then_some(integrational_rates);

        let functional_rates = checked_ratio(functional.passed, functional.total)
            .map(|passed| FunctionalRates { passed });

        RateSummary {
            unit: unit_rates,
            integrational: integrational_rates,
            functional: functional_rates,
        }
    }

    /// @ai:intent Build the summary for a finished run
    /// @ai:effects time
    pub fn summary(&self, model: &str) -> BenchmarkSummary {
        BenchmarkSummary {
            model: model.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            tasks_scored: self.tasks_scored,
            overall: Self::rates(&self.overall),
            by_language: self
                .by_language
                .iter()
                .map(|(language, counters)| (*language, Self::rates(counters)))
                .collect(),
        }
    }

    fn language_mut(&mut self, language: Language) -> &mut CounterSet {
        self.by_language.entry(language).or_default()
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:effects state:write
    fn record_unit(&mut self, language: Language, contribution: UnitCounters) {
        self.overall.unit += contribution;
        self.language_mut(language).unit += contribution;
    }

    /// @ai:effects state:write
    fn record_integrational(&mut self, language: Language, contribution: IntegrationalCounters) {
        self.overall.integrational += contribution;
        self.language_mut(language).integrational += contribution;
    }

    /// @ai:effects state:write
    fn record_functional(&mut self, language: Language, contribution: FunctionalCounters) {
        self.overall.functional += contribution;
        self.language_mut(language).functional += contribution;
    }

    /// @ai:effects state:write
    fn mark_scored(&mut self) {
        self.tasks_scored += 1;
    }
}

/// @ai:pre denominator > 0
fn ratio(numerator: u64, denominator: u64) -> f64 {
    numerator as f64 / denominator as f64
}

fn checked_ratio(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator > 0).then(|| ratio(numerator, denominator))
}
