//! Test helper factories and mock state builders
//!
//! Provides convenience functions for creating dataset records with sensible
//! defaults, and helpers for building mock AppState / graph stores.
#![allow(dead_code)]

use crate::knowledge::{
    ConceptRecord, Dataset, KnowledgeLoader, ProblemRecord, RefreshMode, SolutionRecord,
    StepRecord,
};
use crate::neo4j::mock::MockGraphStore;
use crate::{AppState, Config, LlmSettings};
use std::sync::Arc;

// ============================================================================
// Mock state builders
// ============================================================================

/// Create a mock AppState with an empty in-memory graph
pub fn mock_app_state() -> AppState {
    AppState {
        neo4j: Arc::new(MockGraphStore::new()),
        config: Arc::new(Config {
            neo4j_uri: "bolt://mock:7687".to_string(),
            neo4j_user: "neo4j".to_string(),
            neo4j_password: "mock".to_string(),
            server_port: 0,
            engine_port: 0,
            engine_url: "http://mock:8000/solve".to_string(),
            llm: LlmSettings::default(),
            data_dir: "data/knowledge_graph".into(),
        }),
    }
}

/// A mock graph store holding the sample dataset
pub async fn loaded_store() -> Arc<MockGraphStore> {
    let store = Arc::new(MockGraphStore::new());
    KnowledgeLoader::new(store.clone())
        .load(&sample_dataset(), RefreshMode::Replace)
        .await
        .expect("sample dataset loads");
    store
}

// ============================================================================
// Record factories
// ============================================================================

pub fn concept(name: &str, requires: &[&str]) -> ConceptRecord {
    ConceptRecord {
        name: name.to_string(),
        description: format!("The concept of {}", name),
        example: None,
        requires: requires.iter().map(|r| r.to_string()).collect(),
    }
}

pub fn problem(id: &str, text: &str) -> ProblemRecord {
    ProblemRecord {
        id: id.to_string(),
        text: text.to_string(),
        difficulty: "easy".to_string(),
    }
}

pub fn step(step_number: i64, explanation: &str, related: &[&str]) -> StepRecord {
    StepRecord {
        id: None,
        step_number,
        step_explanation: explanation.to_string(),
        math_transformation: String::new(),
        related_concepts: related.iter().map(|r| r.to_string()).collect(),
    }
}

/// addition, fractions (requires addition), problem p1 "1+1/2" and solution s1
pub fn sample_dataset() -> Dataset {
    Dataset {
        concepts: vec![concept("addition", &[]), concept("fractions", &["addition"])],
        problems: vec![problem("p1", "1+1/2")],
        solutions: vec![SolutionRecord {
            id: Some("s1".to_string()),
            problem_id: "p1".to_string(),
            source: "test".to_string(),
            date: "2024-01-01".to_string(),
            steps: vec![StepRecord {
                math_transformation: "1+1/2=3/2".to_string(),
                ..step(1, "add numerators", &["fractions"])
            }],
        }],
    }
}
