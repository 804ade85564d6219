//! @ai:module:intent Counter and rate types for benchmark results
//! @ai:module:layer domain
//! @ai:module:public_api UnitCounters, IntegrationalCounters, FunctionalCounters, CounterSet, UnitRates, IntegrationalRates, FunctionalRates, RateSummary, BenchmarkSummary
//! @ai:module:stateless true

use crate::dataset::Language;
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// @ai:intent Unit-category counters; also used as a per-task contribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitCounters {
    /// Tests that ran against base code without erroring
    pub executable: u64,
    /// Executable tests of suites whose error/failure profile changed under mutation
    pub mutated: u64,
    pub total: u64,
    /// Tests failing against presumed-correct base code
    pub spammy: u64,
}

/// @ai:intent Integrational-category counters; also used as a per-task contribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationalCounters {
    pub correct: u64,
    pub incorrect: u64,
    pub total_correct: u64,
    pub total_incorrect: u64,
}

/// @ai:intent Functional-category counters; also used as a per-task contribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionalCounters {
    pub passed: u64,
    pub total: u64,
}

impl AddAssign for UnitCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.executable += rhs.executable;
        self.mutated += rhs.mutated;
        self.total += rhs.total;
        self.spammy += rhs.spammy;
    }
}

impl AddAssign for IntegrationalCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.correct += rhs.correct;
        self.incorrect += rhs.incorrect;
        self.total_correct += rhs.total_correct;
        self.total_incorrect += rhs.total_incorrect;
    }
}

impl AddAssign for FunctionalCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.passed += rhs.passed;
        self.total += rhs.total;
    }
}

/// @ai:intent Counters of all three categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSet {
    pub unit: UnitCounters,
    pub integrational: IntegrationalCounters,
    pub functional: FunctionalCounters,
}

/// @ai:intent Unit rates; all share the `total` denominator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRates {
    pub executable: f64,
    pub mutation_detection: f64,
    pub spam: f64,
}

/// @ai:intent Integrational rates; each omitted when its own denominator is zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationalRates {
    pub correct_passed: Option<f64>,
    pub incorrect_failed: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionalRates {
    pub passed: f64,
}

/// @ai:intent Rates for one counter set; a category with nothing to rate is `None`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSummary {
    pub unit: Option<UnitRates>,
    pub integrational: Option<IntegrationalRates>,
    pub functional: Option<FunctionalRates>,
}

impl RateSummary {
    /// @ai:intent Whether no category produced a rate
    /// @ai:effects pure
    pub fn is_empty(&self) -> bool {
        self.unit.is_none() && self.integrational.is_none() && self.functional.is_none()
    }
}

/// @ai:intent Final result of one model's run
#[derive(Debug, Clone)]
pub struct BenchmarkSummary {
    pub model: String,
    pub timestamp: String,
    pub tasks_scored: u32,
    pub overall: RateSummary,
    pub by_language: BTreeMap<Language, RateSummary>,
}
