//! Knowledge-graph ingestion
//!
//! - `records`: typed dataset records read from YAML, validated up front
//! - `resolve`: fixed-point retry of forward references
//! - `loader`: upserts a dataset into a `GraphStore` and reports every gap

pub mod loader;
pub mod records;
pub mod resolve;

pub use loader::{KnowledgeLoader, LoadReport, RefreshMode};
pub use records::{
    ConceptRecord, Dataset, DatasetError, ProblemRecord, SolutionRecord, StepRecord,
};
pub use resolve::{resolve_pending, Resolution};
