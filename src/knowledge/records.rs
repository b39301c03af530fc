//! Dataset records read from the knowledge-graph YAML files
//!
//! Records are validated when they are read: a missing file, a YAML error or
//! a blank required field aborts the load before anything touches the graph.

use crate::neo4j::models::{ConceptNode, ProblemNode, SolutionNode, StepNode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names expected inside a data directory
pub const CONCEPTS_FILE: &str = "concepts.yaml";
pub const PROBLEMS_FILE: &str = "problems.yaml";
pub const SOLUTIONS_FILE: &str = "solutions.yaml";

/// Errors raised while reading or validating a dataset
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{kind} #{index}: required field `{field}` is empty")]
    EmptyField {
        kind: &'static str,
        index: usize,
        field: &'static str,
    },
}

// ============================================================================
// Records
// ============================================================================

/// A concept entry (`concepts.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub example: Option<String>,
    /// Names of prerequisite concepts
    #[serde(default)]
    pub requires: Vec<String>,
}

/// A problem entry (`problems.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRecord {
    pub id: String,
    pub text: String,
    pub difficulty: String,
}

/// A solution entry (`solutions.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub problem_id: String,
    pub source: String,
    pub date: String,
    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

/// One step of a solution entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub step_number: i64,
    pub step_explanation: String,
    pub math_transformation: String,
    #[serde(default)]
    pub related_concepts: Vec<String>,
}

impl ConceptRecord {
    pub fn to_node(&self) -> ConceptNode {
        ConceptNode {
            name: self.name.clone(),
            description: self.description.clone(),
            example: self.example.clone(),
        }
    }
}

impl ProblemRecord {
    pub fn to_node(&self) -> ProblemNode {
        ProblemNode {
            id: self.id.clone(),
            text: self.text.clone(),
            difficulty: self.difficulty.clone(),
        }
    }
}

impl SolutionRecord {
    /// The supplied id, or `{problem_id}_{source}_{date}`
    pub fn resolved_id(&self) -> String {
        match &self.id {
            Some(id) if !id.trim().is_empty() => id.clone(),
            _ => format!("{}_{}_{}", self.problem_id, self.source, self.date),
        }
    }

    pub fn to_node(&self) -> SolutionNode {
        SolutionNode {
            id: self.resolved_id(),
            problem_id: self.problem_id.clone(),
            source: self.source.clone(),
            date: self.date.clone(),
        }
    }
}

impl StepRecord {
    /// The supplied id, or `{solution_id}_step_{n}`
    pub fn resolved_id(&self, solution_id: &str) -> String {
        match &self.id {
            Some(id) if !id.trim().is_empty() => id.clone(),
            _ => format!("{}_step_{}", solution_id, self.step_number),
        }
    }

    pub fn to_node(&self, solution_id: &str) -> StepNode {
        StepNode {
            id: self.resolved_id(solution_id),
            step_number: self.step_number,
            step_explanation: self.step_explanation.clone(),
            math_transformation: self.math_transformation.clone(),
            related_concepts: self.related_concepts.clone(),
        }
    }
}

// ============================================================================
// File wrappers
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct ConceptsFile {
    #[serde(default)]
    concepts: Vec<ConceptRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct ProblemsFile {
    #[serde(default)]
    problems: Vec<ProblemRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct SolutionsFile {
    #[serde(default)]
    solutions: Vec<SolutionRecord>,
}

// ============================================================================
// Dataset
// ============================================================================

/// Everything one load pass ingests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub concepts: Vec<ConceptRecord>,
    pub problems: Vec<ProblemRecord>,
    pub solutions: Vec<SolutionRecord>,
}

impl Dataset {
    /// Read `concepts.yaml`, `problems.yaml` and `solutions.yaml` from a directory
    pub fn from_dir(dir: &Path) -> Result<Self, DatasetError> {
        let concepts: ConceptsFile = read_yaml(&dir.join(CONCEPTS_FILE))?;
        let problems: ProblemsFile = read_yaml(&dir.join(PROBLEMS_FILE))?;
        let solutions: SolutionsFile = read_yaml(&dir.join(SOLUTIONS_FILE))?;

        let dataset = Self {
            concepts: concepts.concepts,
            problems: problems.problems,
            solutions: solutions.solutions,
        };
        dataset.validate()?;

        tracing::info!(
            "Read dataset from {}: {} concepts, {} problems, {} solutions",
            dir.display(),
            dataset.concepts.len(),
            dataset.problems.len(),
            dataset.solutions.len()
        );

        Ok(dataset)
    }

    /// Append another dataset's records after this one's
    pub fn extend(&mut self, other: Dataset) {
        self.concepts.extend(other.concepts);
        self.problems.extend(other.problems);
        self.solutions.extend(other.solutions);
    }

    /// Reject records whose required text fields are blank
    pub fn validate(&self) -> Result<(), DatasetError> {
        for (index, c) in self.concepts.iter().enumerate() {
            require("Concept", index, "name", &c.name)?;
        }
        for (index, p) in self.problems.iter().enumerate() {
            require("Problem", index, "id", &p.id)?;
            require("Problem", index, "text", &p.text)?;
        }
        for (index, s) in self.solutions.iter().enumerate() {
            require("Solution", index, "problem_id", &s.problem_id)?;
            require("Solution", index, "source", &s.source)?;
            require("Solution", index, "date", &s.date)?;
        }
        Ok(())
    }
}

fn require(
    kind: &'static str,
    index: usize,
    field: &'static str,
    value: &str,
) -> Result<(), DatasetError> {
    if value.trim().is_empty() {
        return Err(DatasetError::EmptyField { kind, index, field });
    }
    Ok(())
}

fn read_yaml<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // An empty file parses as YAML null
    if contents.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
