//! @ai:module:intent Report generation for benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api TextReporter, TextReporterTrait

pub mod text_report;

pub use text_report::{TextReporter, TextReporterTrait};
