//! Graph loader
//!
//! Upserts a [`Dataset`] into the graph store. REQUIRES edges whose
//! prerequisite is not in the store yet are deferred and retried in
//! fixed-point passes; every reference that never resolves is reported
//! in the [`LoadReport`] and logged once.

use super::records::{Dataset, SolutionRecord};
use super::resolve::resolve_pending;
use crate::neo4j::GraphStore;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Whether a load starts from an empty graph.
///
/// There is deliberately no `Default`: wiping the graph has to be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Delete every node and relationship before loading
    Replace,
    /// Upsert over whatever is already stored
    Merge,
}

/// A prerequisite edge that could not be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingPrerequisite {
    pub concept: String,
    pub prerequisite: String,
}

/// A step that names a concept missing from the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingConcept {
    pub step_id: String,
    pub concept: String,
}

/// A solution whose problem is not in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanSolution {
    pub solution_id: String,
    pub problem_id: String,
}

/// Summary of one load pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub concepts: usize,
    pub problems: usize,
    pub solutions: usize,
    pub steps: usize,
    pub prerequisite_edges: usize,
    pub concept_links: usize,
    /// Fixed-point passes spent on deferred prerequisites
    pub resolution_passes: usize,
    pub unresolved_prerequisites: Vec<PendingPrerequisite>,
    pub missing_concepts: Vec<MissingConcept>,
    pub orphan_solutions: Vec<OrphanSolution>,
}

impl LoadReport {
    /// True when every reference in the dataset resolved
    pub fn is_consistent(&self) -> bool {
        self.unresolved_prerequisites.is_empty()
            && self.missing_concepts.is_empty()
            && self.orphan_solutions.is_empty()
    }
}

/// Loads datasets into a [`GraphStore`]
pub struct KnowledgeLoader {
    graph: Arc<dyn GraphStore>,
}

impl KnowledgeLoader {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }

    /// Run one full load pass
    pub async fn load(&self, dataset: &Dataset, mode: RefreshMode) -> Result<LoadReport> {
        dataset.validate()?;

        if mode == RefreshMode::Replace {
            tracing::warn!("Erasing all existing nodes and relationships before load");
            self.graph
                .clear_all()
                .await
                .context("Failed to clear the graph")?;
        }

        self.graph
            .init_schema()
            .await
            .context("Failed to declare constraints")?;

        let mut report = LoadReport::default();
        self.load_concepts(dataset, &mut report).await?;

        for problem in &dataset.problems {
            self.graph.upsert_problem(&problem.to_node()).await?;
            tracing::debug!("Upserted problem {}", problem.id);
            report.problems += 1;
        }

        for solution in &dataset.solutions {
            self.load_solution(solution, &mut report).await?;
        }

        tracing::info!(
            "Load complete: {} concepts, {} problems, {} solutions, {} steps, {} prerequisite edges, {} concept links",
            report.concepts,
            report.problems,
            report.solutions,
            report.steps,
            report.prerequisite_edges,
            report.concept_links
        );
        if !report.is_consistent() {
            tracing::warn!(
                "Load finished with gaps: {} unresolved prerequisites, {} missing concepts, {} orphan solutions",
                report.unresolved_prerequisites.len(),
                report.missing_concepts.len(),
                report.orphan_solutions.len()
            );
        }

        Ok(report)
    }

    async fn load_concepts(&self, dataset: &Dataset, report: &mut LoadReport) -> Result<()> {
        let mut pending = Vec::new();
        // A pair listed twice (repeated record or repeated name) is linked once
        let mut seen = HashSet::new();

        for concept in &dataset.concepts {
            self.graph.upsert_concept(&concept.to_node()).await?;
            tracing::debug!("Upserted concept {}", concept.name);
            report.concepts += 1;

            for prereq in &concept.requires {
                if !seen.insert((concept.name.as_str(), prereq.as_str())) {
                    continue;
                }
                if self.graph.link_prerequisite(&concept.name, prereq).await? {
                    report.prerequisite_edges += 1;
                } else {
                    pending.push(PendingPrerequisite {
                        concept: concept.name.clone(),
                        prerequisite: prereq.clone(),
                    });
                }
            }
        }

        if pending.is_empty() {
            return Ok(());
        }

        tracing::debug!("Deferring {} prerequisite edges", pending.len());
        let graph = self.graph.clone();
        let resolution = resolve_pending(pending, |edge: PendingPrerequisite| {
            let graph = graph.clone();
            async move {
                graph
                    .link_prerequisite(&edge.concept, &edge.prerequisite)
                    .await
            }
        })
        .await?;

        report.prerequisite_edges += resolution.resolved.len();
        report.resolution_passes = resolution.passes;
        for edge in &resolution.unresolved {
            tracing::warn!(
                "Prerequisite '{}' of concept '{}' never appeared; REQUIRES edge omitted",
                edge.prerequisite,
                edge.concept
            );
        }
        report.unresolved_prerequisites = resolution.unresolved;

        Ok(())
    }

    async fn load_solution(&self, record: &SolutionRecord, report: &mut LoadReport) -> Result<()> {
        let solution = record.to_node();
        self.graph.upsert_solution(&solution).await?;
        report.solutions += 1;

        // Problems load first, so a miss here is a dataset error, not ordering
        if !self
            .graph
            .link_problem_solution(&record.problem_id, &solution.id)
            .await?
        {
            tracing::warn!(
                "Solution '{}' references unknown problem '{}'",
                solution.id,
                record.problem_id
            );
            report.orphan_solutions.push(OrphanSolution {
                solution_id: solution.id.clone(),
                problem_id: record.problem_id.clone(),
            });
        }

        for step_record in &record.steps {
            let step = step_record.to_node(&solution.id);
            self.graph.upsert_step(&step).await?;
            self.graph.link_solution_step(&solution.id, &step.id).await?;
            report.steps += 1;

            for concept in &step.related_concepts {
                if self.graph.link_step_concept(&step.id, concept).await? {
                    report.concept_links += 1;
                } else {
                    tracing::warn!(
                        "Step '{}' applies unknown concept '{}'; link skipped",
                        step.id,
                        concept
                    );
                    report.missing_concepts.push(MissingConcept {
                        step_id: step.id.clone(),
                        concept: concept.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
