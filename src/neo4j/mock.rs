//! In-memory mock implementation of GraphStore for testing.
//!
//! Provides a complete mock of all graph operations using
//! `tokio::sync::RwLock` collections.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

type EdgeSet = RwLock<BTreeSet<(String, String)>>;

/// In-memory mock implementation of GraphStore for testing.
pub struct MockGraphStore {
    // Entity stores
    pub concepts: RwLock<BTreeMap<String, ConceptNode>>,
    pub problems: RwLock<BTreeMap<String, ProblemNode>>,
    pub solutions: RwLock<BTreeMap<String, SolutionNode>>,
    pub steps: RwLock<BTreeMap<String, StepNode>>,

    // Relationships (from, to)
    pub requires: EdgeSet,
    pub has_solution: EdgeSet,
    pub has_step: EdgeSet,
    pub applies_concept: EdgeSet,

    /// Number of times `clear_all` ran
    pub clear_calls: RwLock<usize>,
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self {
            concepts: RwLock::new(BTreeMap::new()),
            problems: RwLock::new(BTreeMap::new()),
            solutions: RwLock::new(BTreeMap::new()),
            steps: RwLock::new(BTreeMap::new()),
            requires: RwLock::new(BTreeSet::new()),
            has_solution: RwLock::new(BTreeSet::new()),
            has_step: RwLock::new(BTreeSet::new()),
            applies_concept: RwLock::new(BTreeSet::new()),
            clear_calls: RwLock::new(0),
        }
    }

    // ========================================================================
    // Builder / seeding methods for tests
    // ========================================================================

    /// Seed a concept into the store.
    pub async fn with_concept(self, concept: ConceptNode) -> Self {
        self.concepts
            .write()
            .await
            .insert(concept.name.clone(), concept);
        self
    }

    /// Seed a problem into the store.
    pub async fn with_problem(self, problem: ProblemNode) -> Self {
        self.problems
            .write()
            .await
            .insert(problem.id.clone(), problem);
        self
    }

    /// Whether `(from)-[:REQUIRES]->(to)` exists
    pub async fn has_requires(&self, from: &str, to: &str) -> bool {
        self.requires
            .read()
            .await
            .contains(&(from.to_string(), to.to_string()))
    }

    /// Whether `(step)-[:APPLIES_CONCEPT]->(concept)` exists
    pub async fn has_applies(&self, step_id: &str, concept: &str) -> bool {
        self.applies_concept
            .read()
            .await
            .contains(&(step_id.to_string(), concept.to_string()))
    }

    async fn link(
        edges: &EdgeSet,
        from_exists: bool,
        to_exists: bool,
        from: &str,
        to: &str,
    ) -> bool {
        if !(from_exists && to_exists) {
            return false;
        }
        edges
            .write()
            .await
            .insert((from.to_string(), to.to_string()));
        true
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    // ========================================================================
    // Schema / lifecycle
    // ========================================================================

    async fn init_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        self.concepts.write().await.clear();
        self.problems.write().await.clear();
        self.solutions.write().await.clear();
        self.steps.write().await.clear();
        self.requires.write().await.clear();
        self.has_solution.write().await.clear();
        self.has_step.write().await.clear();
        self.applies_concept.write().await.clear();
        *self.clear_calls.write().await += 1;
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn graph_counts(&self) -> Result<GraphCounts> {
        Ok(GraphCounts {
            concepts: self.concepts.read().await.len() as u64,
            problems: self.problems.read().await.len() as u64,
            solutions: self.solutions.read().await.len() as u64,
            steps: self.steps.read().await.len() as u64,
            requires: self.requires.read().await.len() as u64,
            has_solution: self.has_solution.read().await.len() as u64,
            has_step: self.has_step.read().await.len() as u64,
            applies_concept: self.applies_concept.read().await.len() as u64,
        })
    }

    // ========================================================================
    // Upserts
    // ========================================================================

    async fn upsert_concept(&self, concept: &ConceptNode) -> Result<()> {
        self.concepts
            .write()
            .await
            .insert(concept.name.clone(), concept.clone());
        Ok(())
    }

    async fn upsert_problem(&self, problem: &ProblemNode) -> Result<()> {
        self.problems
            .write()
            .await
            .insert(problem.id.clone(), problem.clone());
        Ok(())
    }

    async fn upsert_solution(&self, solution: &SolutionNode) -> Result<()> {
        self.solutions
            .write()
            .await
            .insert(solution.id.clone(), solution.clone());
        Ok(())
    }

    async fn upsert_step(&self, step: &StepNode) -> Result<()> {
        self.steps
            .write()
            .await
            .insert(step.id.clone(), step.clone());
        Ok(())
    }

    // ========================================================================
    // Relationships
    // ========================================================================

    async fn concept_exists(&self, name: &str) -> Result<bool> {
        Ok(self.concepts.read().await.contains_key(name))
    }

    async fn link_prerequisite(&self, concept: &str, prereq: &str) -> Result<bool> {
        let (from, to) = {
            let concepts = self.concepts.read().await;
            (concepts.contains_key(concept), concepts.contains_key(prereq))
        };
        Ok(Self::link(&self.requires, from, to, concept, prereq).await)
    }

    async fn link_problem_solution(&self, problem_id: &str, solution_id: &str) -> Result<bool> {
        let from = self.problems.read().await.contains_key(problem_id);
        let to = self.solutions.read().await.contains_key(solution_id);
        Ok(Self::link(&self.has_solution, from, to, problem_id, solution_id).await)
    }

    async fn link_solution_step(&self, solution_id: &str, step_id: &str) -> Result<bool> {
        let from = self.solutions.read().await.contains_key(solution_id);
        let to = self.steps.read().await.contains_key(step_id);
        Ok(Self::link(&self.has_step, from, to, solution_id, step_id).await)
    }

    async fn link_step_concept(&self, step_id: &str, concept: &str) -> Result<bool> {
        let from = self.steps.read().await.contains_key(step_id);
        let to = self.concepts.read().await.contains_key(concept);
        Ok(Self::link(&self.applies_concept, from, to, step_id, concept).await)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    async fn find_solution_by_problem_text(&self, text: &str) -> Result<Option<SolutionDetails>> {
        let problem_ids: Vec<String> = self
            .problems
            .read()
            .await
            .values()
            .filter(|p| p.text == text)
            .map(|p| p.id.clone())
            .collect();

        // BTreeSet iteration is ordered, so the smallest solution id comes first
        let solution_id = self
            .has_solution
            .read()
            .await
            .iter()
            .filter(|(p, _)| problem_ids.contains(p))
            .map(|(_, s)| s.clone())
            .min();
        let Some(solution_id) = solution_id else {
            return Ok(None);
        };
        let Some(solution) = self.solutions.read().await.get(&solution_id).cloned() else {
            return Ok(None);
        };

        let step_ids: Vec<String> = self
            .has_step
            .read()
            .await
            .iter()
            .filter(|(s, _)| *s == solution_id)
            .map(|(_, st)| st.clone())
            .collect();

        let steps_map = self.steps.read().await;
        let applies = self.applies_concept.read().await;
        let mut steps: Vec<StepDetails> = step_ids
            .iter()
            .filter_map(|id| steps_map.get(id))
            .map(|step| StepDetails {
                step: step.clone(),
                applies_concepts: applies
                    .iter()
                    .filter(|(st, _)| *st == step.id)
                    .map(|(_, c)| c.clone())
                    .collect(),
            })
            .collect();
        steps.sort_by_key(|s| s.step.step_number);

        Ok(Some(SolutionDetails { solution, steps }))
    }

    async fn list_concepts(&self) -> Result<Vec<ConceptWithDependents>> {
        let concepts = self.concepts.read().await;
        let requires = self.requires.read().await;
        Ok(concepts
            .values()
            .map(|c| ConceptWithDependents {
                concept: c.clone(),
                dependents: requires
                    .iter()
                    .filter(|(_, to)| *to == c.name)
                    .map(|(from, _)| from.clone())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
            })
            .collect())
    }

    async fn list_problems(&self) -> Result<Vec<ProblemNode>> {
        Ok(self.problems.read().await.values().cloned().collect())
    }
}
