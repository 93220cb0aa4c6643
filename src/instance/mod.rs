//! Game instances: the JSON schema and the solvable-sequence generator.

pub mod generator;
pub mod schema;

pub use generator::{ExperimentConfig, GeneratorConfig, InstanceGenerator};
pub use schema::{Experiment, Instance, InstanceSet};
