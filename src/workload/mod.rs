pub mod csv;
pub mod errors;
pub mod generator;
pub mod op;
pub mod runner;

pub use errors::WorkloadError;
pub use generator::{Generator, GeneratorParams};
pub use op::Operation;
pub use runner::{Experiment, ExperimentResult, REPORT_COLUMNS, run_experiment};
