//! @ai:module:intent Metrics collection and aggregation
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, CounterSet, UnitCounters, IntegrationalCounters, FunctionalCounters, BenchmarkSummary, RateSummary

pub mod aggregator;
pub mod types;

pub use aggregator::{MetricsAggregator, MetricsAggregatorTrait};
pub use types::{
    BenchmarkSummary, CounterSet, FunctionalCounters, FunctionalRates, IntegrationalCounters,
    IntegrationalRates, RateSummary, UnitCounters, UnitRates,
};
