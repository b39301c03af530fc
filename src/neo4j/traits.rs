//! GraphStore trait definition
//!
//! Defines the abstract interface for all Neo4j graph operations.
//! This trait mirrors the public async methods of `Neo4jClient`,
//! enabling testing with the in-memory mock.

use crate::neo4j::models::*;
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for all graph database operations.
///
/// Every public async method of `Neo4jClient` (excluding `new` and private
/// helpers) is represented here.
#[async_trait]
pub trait GraphStore: Send + Sync {
    // ========================================================================
    // Schema / lifecycle
    // ========================================================================

    /// Declare uniqueness constraints and indexes (idempotent)
    async fn init_schema(&self) -> Result<()>;

    /// Delete every node and relationship
    async fn clear_all(&self) -> Result<()>;

    /// Check that the database answers
    async fn health_check(&self) -> Result<bool>;

    /// Count nodes per label and relationships per type
    async fn graph_counts(&self) -> Result<GraphCounts>;

    // ========================================================================
    // Upserts
    // ========================================================================

    /// Create or update a concept keyed by name
    async fn upsert_concept(&self, concept: &ConceptNode) -> Result<()>;

    /// Create or update a problem keyed by id
    async fn upsert_problem(&self, problem: &ProblemNode) -> Result<()>;

    /// Create or update a solution keyed by id
    async fn upsert_solution(&self, solution: &SolutionNode) -> Result<()>;

    /// Create or update a step keyed by id
    async fn upsert_step(&self, step: &StepNode) -> Result<()>;

    // ========================================================================
    // Relationships
    // ========================================================================

    /// Whether a concept with this name exists
    async fn concept_exists(&self, name: &str) -> Result<bool>;

    /// Create `(concept)-[:REQUIRES]->(prereq)` if both exist.
    ///
    /// Returns true when the edge exists afterwards.
    async fn link_prerequisite(&self, concept: &str, prereq: &str) -> Result<bool>;

    /// Create `(problem)-[:HAS_SOLUTION]->(solution)` if both exist
    async fn link_problem_solution(&self, problem_id: &str, solution_id: &str) -> Result<bool>;

    /// Create `(solution)-[:HAS_STEP]->(step)` if both exist
    async fn link_solution_step(&self, solution_id: &str, step_id: &str) -> Result<bool>;

    /// Create `(step)-[:APPLIES_CONCEPT]->(concept)` if both exist
    async fn link_step_concept(&self, step_id: &str, concept: &str) -> Result<bool>;

    // ========================================================================
    // Queries
    // ========================================================================

    /// Find the stored solution for a problem with exactly this text
    async fn find_solution_by_problem_text(&self, text: &str) -> Result<Option<SolutionDetails>>;

    /// List all concepts with the names of concepts that require them
    async fn list_concepts(&self) -> Result<Vec<ConceptWithDependents>>;

    /// List all problems
    async fn list_problems(&self) -> Result<Vec<ProblemNode>>;
}
