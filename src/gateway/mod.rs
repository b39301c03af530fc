//! Query gateway: stored solution first, generation second
//!
//! Lookup is an exact match on the problem text. A miss is forwarded to the
//! generation engine; the generated answer is returned but not written back
//! to the graph.

pub mod engine_client;

#[cfg(test)]
pub(crate) mod mock;

pub use engine_client::{EngineClient, GenerationError, HttpEngineClient};

use crate::neo4j::models::{ConceptWithDependents, ProblemNode, SolutionDetails};
use crate::neo4j::GraphStore;
use serde_json::Value;
use std::sync::Arc;

/// Where a solution came from
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Stored(SolutionDetails),
    Generated(Value),
}

impl SolveOutcome {
    /// Label reported to API clients
    pub fn source(&self) -> &'static str {
        match self {
            SolveOutcome::Stored(_) => "knowledge_graph",
            SolveOutcome::Generated(_) => "engine",
        }
    }
}

/// Failure of a gateway query
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Graph query failed: {0}")]
    Graph(#[source] anyhow::Error),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Lookup-or-generate service shared by the gateway handlers
#[derive(Clone)]
pub struct SolveGateway {
    graph: Arc<dyn GraphStore>,
    engine: Arc<dyn EngineClient>,
}

impl SolveGateway {
    pub fn new(graph: Arc<dyn GraphStore>, engine: Arc<dyn EngineClient>) -> Self {
        Self { graph, engine }
    }

    pub fn graph(&self) -> &Arc<dyn GraphStore> {
        &self.graph
    }

    pub async fn solve(&self, problem: &str) -> Result<SolveOutcome, GatewayError> {
        if let Some(details) = self
            .graph
            .find_solution_by_problem_text(problem)
            .await
            .map_err(GatewayError::Graph)?
        {
            tracing::debug!("Stored solution {} found", details.solution.id);
            return Ok(SolveOutcome::Stored(details));
        }

        tracing::info!("No stored solution, forwarding to the solution engine");
        match self.engine.generate(problem).await {
            Ok(value) => Ok(SolveOutcome::Generated(value)),
            Err(e) => {
                tracing::error!("Generation failed: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn concepts(&self) -> Result<Vec<ConceptWithDependents>, GatewayError> {
        self.graph.list_concepts().await.map_err(GatewayError::Graph)
    }

    pub async fn problems(&self) -> Result<Vec<ProblemNode>, GatewayError> {
        self.graph.list_problems().await.map_err(GatewayError::Graph)
    }
}
