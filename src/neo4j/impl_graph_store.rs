//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;

use super::client::Neo4jClient;
use super::models::*;
use super::traits::GraphStore;

#[async_trait]
impl GraphStore for Neo4jClient {
    // ========================================================================
    // Schema / lifecycle
    // ========================================================================

    async fn init_schema(&self) -> anyhow::Result<()> {
        self.init_schema().await
    }

    async fn clear_all(&self) -> anyhow::Result<()> {
        self.clear_all().await
    }

    async fn health_check(&self) -> anyhow::Result<bool> {
        self.health_check().await
    }

    async fn graph_counts(&self) -> anyhow::Result<GraphCounts> {
        self.graph_counts().await
    }

    // ========================================================================
    // Upserts
    // ========================================================================

    async fn upsert_concept(&self, concept: &ConceptNode) -> anyhow::Result<()> {
        self.upsert_concept(concept).await
    }

    async fn upsert_problem(&self, problem: &ProblemNode) -> anyhow::Result<()> {
        self.upsert_problem(problem).await
    }

    async fn upsert_solution(&self, solution: &SolutionNode) -> anyhow::Result<()> {
        self.upsert_solution(solution).await
    }

    async fn upsert_step(&self, step: &StepNode) -> anyhow::Result<()> {
        self.upsert_step(step).await
    }

    // ========================================================================
    // Relationships
    // ========================================================================

    async fn concept_exists(&self, name: &str) -> anyhow::Result<bool> {
        self.concept_exists(name).await
    }

    async fn link_prerequisite(&self, concept: &str, prereq: &str) -> anyhow::Result<bool> {
        self.link_prerequisite(concept, prereq).await
    }

    async fn link_problem_solution(
        &self,
        problem_id: &str,
        solution_id: &str,
    ) -> anyhow::Result<bool> {
        self.link_problem_solution(problem_id, solution_id).await
    }

    async fn link_solution_step(&self, solution_id: &str, step_id: &str) -> anyhow::Result<bool> {
        self.link_solution_step(solution_id, step_id).await
    }

    async fn link_step_concept(&self, step_id: &str, concept: &str) -> anyhow::Result<bool> {
        self.link_step_concept(step_id, concept).await
    }

    // ========================================================================
    // Queries
    // ========================================================================

    async fn find_solution_by_problem_text(
        &self,
        text: &str,
    ) -> anyhow::Result<Option<SolutionDetails>> {
        self.find_solution_by_problem_text(text).await
    }

    async fn list_concepts(&self) -> anyhow::Result<Vec<ConceptWithDependents>> {
        self.list_concepts().await
    }

    async fn list_problems(&self) -> anyhow::Result<Vec<ProblemNode>> {
        self.list_problems().await
    }
}
