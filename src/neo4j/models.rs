//! Neo4j graph models for the math knowledge graph

use serde::{Deserialize, Serialize};

// ============================================================================
// Concept Nodes
// ============================================================================

/// A math concept, keyed by its unique name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptNode {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub example: Option<String>,
}

/// A concept together with the names of the concepts that require it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptWithDependents {
    #[serde(flatten)]
    pub concept: ConceptNode,
    pub dependents: Vec<String>,
}

// ============================================================================
// Problem / Solution / Step Nodes
// ============================================================================

/// A problem statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemNode {
    pub id: String,
    pub text: String,
    pub difficulty: String,
}

/// A worked solution for exactly one problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionNode {
    pub id: String,
    pub problem_id: String,
    pub source: String,
    pub date: String,
}

/// One step of a solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepNode {
    pub id: String,
    pub step_number: i64,
    pub step_explanation: String,
    pub math_transformation: String,
    /// Concept names as written in the dataset (stored as a JSON string property)
    pub related_concepts: Vec<String>,
}

/// A step plus the concepts it is actually linked to via APPLIES_CONCEPT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDetails {
    #[serde(flatten)]
    pub step: StepNode,
    pub applies_concepts: Vec<String>,
}

/// A solution with its steps ordered by step number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionDetails {
    #[serde(flatten)]
    pub solution: SolutionNode,
    pub steps: Vec<StepDetails>,
}

// ============================================================================
// Graph statistics
// ============================================================================

/// Node and relationship counts per type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphCounts {
    pub concepts: u64,
    pub problems: u64,
    pub solutions: u64,
    pub steps: u64,
    pub requires: u64,
    pub has_solution: u64,
    pub has_step: u64,
    pub applies_concept: u64,
}

impl GraphCounts {
    pub fn total_nodes(&self) -> u64 {
        self.concepts + self.problems + self.solutions + self.steps
    }

    pub fn total_relationships(&self) -> u64 {
        self.requires + self.has_solution + self.has_step + self.applies_concept
    }
}

/// Serialize a list of concept names for storage as a Step property
pub fn encode_related_concepts(names: &[String]) -> String {
    serde_json::to_string(names).unwrap_or_else(|_| "[]".to_string())
}

/// Parse the Step `related_concepts` property back into names.
///
/// Malformed values decode to an empty list.
pub fn decode_related_concepts(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}
