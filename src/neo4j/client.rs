//! Neo4j client for interacting with the math knowledge graph

use super::models::*;
use anyhow::{Context, Result};
use neo4rs::{query, Graph, Query};
use std::sync::Arc;

/// Client for Neo4j operations
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        let client = Self {
            graph: Arc::new(graph),
        };

        // Initialize schema
        client.init_schema().await?;

        Ok(client)
    }

    /// Initialize the graph schema with constraints and indexes
    pub async fn init_schema(&self) -> Result<()> {
        let constraints = vec![
            "CREATE CONSTRAINT concept_name IF NOT EXISTS FOR (c:Concept) REQUIRE c.name IS UNIQUE",
            "CREATE CONSTRAINT problem_id IF NOT EXISTS FOR (p:Problem) REQUIRE p.id IS UNIQUE",
            "CREATE CONSTRAINT solution_id IF NOT EXISTS FOR (s:Solution) REQUIRE s.id IS UNIQUE",
            "CREATE CONSTRAINT step_id IF NOT EXISTS FOR (st:Step) REQUIRE st.id IS UNIQUE",
        ];

        let indexes = vec!["CREATE INDEX problem_text IF NOT EXISTS FOR (p:Problem) ON (p.text)"];

        for constraint in constraints {
            if let Err(e) = self.graph.run(query(constraint)).await {
                tracing::warn!("Constraint may already exist: {}", e);
            }
        }

        for index in indexes {
            if let Err(e) = self.graph.run(query(index)).await {
                tracing::warn!("Index may already exist: {}", e);
            }
        }

        Ok(())
    }

    /// Execute a parameterized Cypher query (internal use only)
    pub(crate) async fn execute_with_params(&self, q: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Run a `... RETURN count(*) AS linked` query and report whether anything matched
    async fn run_link(&self, q: Query) -> Result<bool> {
        let rows = self.execute_with_params(q).await?;
        let linked: i64 = rows.first().and_then(|r| r.get("linked").ok()).unwrap_or(0);
        Ok(linked > 0)
    }

    /// Delete every node and relationship in the database
    pub async fn clear_all(&self) -> Result<()> {
        self.graph
            .run(query("MATCH (n) DETACH DELETE n"))
            .await
            .context("Failed to clear the graph")?;
        Ok(())
    }

    /// Check connectivity with a trivial query
    pub async fn health_check(&self) -> Result<bool> {
        let rows = self.execute_with_params(query("RETURN 1 AS ok")).await?;
        Ok(rows
            .first()
            .and_then(|r| r.get::<i64>("ok").ok())
            .is_some_and(|v| v == 1))
    }

    /// Count nodes per label and relationships per type
    pub async fn graph_counts(&self) -> Result<GraphCounts> {
        let q = query(
            r#"
            CALL { MATCH (c:Concept) RETURN count(c) AS concepts }
            CALL { MATCH (p:Problem) RETURN count(p) AS problems }
            CALL { MATCH (s:Solution) RETURN count(s) AS solutions }
            CALL { MATCH (st:Step) RETURN count(st) AS steps }
            CALL { MATCH ()-[r:REQUIRES]->() RETURN count(r) AS requires }
            CALL { MATCH ()-[r:HAS_SOLUTION]->() RETURN count(r) AS has_solution }
            CALL { MATCH ()-[r:HAS_STEP]->() RETURN count(r) AS has_step }
            CALL { MATCH ()-[r:APPLIES_CONCEPT]->() RETURN count(r) AS applies_concept }
            RETURN concepts, problems, solutions, steps,
                   requires, has_solution, has_step, applies_concept
            "#,
        );

        let rows = self.execute_with_params(q).await?;
        let row = rows.first().context("Count query returned no rows")?;
        let count = |key: &str| row.get::<i64>(key).map(|v| v.max(0) as u64).unwrap_or(0);

        Ok(GraphCounts {
            concepts: count("concepts"),
            problems: count("problems"),
            solutions: count("solutions"),
            steps: count("steps"),
            requires: count("requires"),
            has_solution: count("has_solution"),
            has_step: count("has_step"),
            applies_concept: count("applies_concept"),
        })
    }

    // ========================================================================
    // Concept operations
    // ========================================================================

    /// Create or update a concept keyed by name
    pub async fn upsert_concept(&self, concept: &ConceptNode) -> Result<()> {
        let q = query(
            r#"
            MERGE (c:Concept {name: $name})
            SET c.description = $description,
                c.example = $example
            "#,
        )
        .param("name", concept.name.clone())
        .param("description", concept.description.clone())
        .param("example", concept.example.clone().unwrap_or_default());

        self.graph.run(q).await?;
        Ok(())
    }

    /// Whether a concept with this name exists
    pub async fn concept_exists(&self, name: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (c:Concept {name: $name})
            RETURN count(c) AS linked
            "#,
        )
        .param("name", name);

        self.run_link(q).await
    }

    /// Create a REQUIRES edge between two existing concepts
    pub async fn link_prerequisite(&self, concept: &str, prereq: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (c:Concept {name: $concept})
            MATCH (pr:Concept {name: $prereq})
            MERGE (c)-[:REQUIRES]->(pr)
            RETURN count(*) AS linked
            "#,
        )
        .param("concept", concept)
        .param("prereq", prereq);

        self.run_link(q).await
    }

    /// List all concepts, each with the names of concepts that require it
    pub async fn list_concepts(&self) -> Result<Vec<ConceptWithDependents>> {
        let q = query(
            r#"
            MATCH (c:Concept)
            OPTIONAL MATCH (d:Concept)-[:REQUIRES]->(c)
            WITH c, d ORDER BY d.name
            RETURN c, collect(d.name) AS dependents
            ORDER BY c.name
            "#,
        );

        let rows = self.execute_with_params(q).await?;
        let mut concepts = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("c")?;
            concepts.push(ConceptWithDependents {
                concept: self.node_to_concept(&node)?,
                dependents: row.get::<Vec<String>>("dependents").unwrap_or_default(),
            });
        }

        Ok(concepts)
    }

    fn node_to_concept(&self, node: &neo4rs::Node) -> Result<ConceptNode> {
        Ok(ConceptNode {
            name: node.get("name")?,
            description: node.get("description").unwrap_or_default(),
            example: node
                .get::<String>("example")
                .ok()
                .filter(|e| !e.is_empty()),
        })
    }

    // ========================================================================
    // Problem operations
    // ========================================================================

    /// Create or update a problem keyed by id
    pub async fn upsert_problem(&self, problem: &ProblemNode) -> Result<()> {
        let q = query(
            r#"
            MERGE (p:Problem {id: $id})
            SET p.text = $text,
                p.difficulty = $difficulty
            "#,
        )
        .param("id", problem.id.clone())
        .param("text", problem.text.clone())
        .param("difficulty", problem.difficulty.clone());

        self.graph.run(q).await?;
        Ok(())
    }

    /// List all problems
    pub async fn list_problems(&self) -> Result<Vec<ProblemNode>> {
        let q = query(
            r#"
            MATCH (p:Problem)
            RETURN p
            ORDER BY p.id
            "#,
        );

        let rows = self.execute_with_params(q).await?;
        let mut problems = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("p")?;
            problems.push(ProblemNode {
                id: node.get("id")?,
                text: node.get("text").unwrap_or_default(),
                difficulty: node.get("difficulty").unwrap_or_default(),
            });
        }

        Ok(problems)
    }

    // ========================================================================
    // Solution / Step operations
    // ========================================================================

    /// Create or update a solution keyed by id
    pub async fn upsert_solution(&self, solution: &SolutionNode) -> Result<()> {
        let q = query(
            r#"
            MERGE (s:Solution {id: $id})
            SET s.problem_id = $problem_id,
                s.source = $source,
                s.date = $date
            "#,
        )
        .param("id", solution.id.clone())
        .param("problem_id", solution.problem_id.clone())
        .param("source", solution.source.clone())
        .param("date", solution.date.clone());

        self.graph.run(q).await?;
        Ok(())
    }

    /// Create or update a step keyed by id
    pub async fn upsert_step(&self, step: &StepNode) -> Result<()> {
        let q = query(
            r#"
            MERGE (st:Step {id: $id})
            SET st.step_explanation = $step_explanation,
                st.math_transformation = $math_transformation,
                st.related_concepts = $related_concepts,
                st.step_number = $step_number
            "#,
        )
        .param("id", step.id.clone())
        .param("step_explanation", step.step_explanation.clone())
        .param("math_transformation", step.math_transformation.clone())
        .param(
            "related_concepts",
            encode_related_concepts(&step.related_concepts),
        )
        .param("step_number", step.step_number);

        self.graph.run(q).await?;
        Ok(())
    }

    /// Link a problem to one of its solutions
    pub async fn link_problem_solution(&self, problem_id: &str, solution_id: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (p:Problem {id: $problem_id})
            MATCH (s:Solution {id: $solution_id})
            MERGE (p)-[:HAS_SOLUTION]->(s)
            RETURN count(*) AS linked
            "#,
        )
        .param("problem_id", problem_id)
        .param("solution_id", solution_id);

        self.run_link(q).await
    }

    /// Link a solution to one of its steps
    pub async fn link_solution_step(&self, solution_id: &str, step_id: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (s:Solution {id: $solution_id})
            MATCH (st:Step {id: $step_id})
            MERGE (s)-[:HAS_STEP]->(st)
            RETURN count(*) AS linked
            "#,
        )
        .param("solution_id", solution_id)
        .param("step_id", step_id);

        self.run_link(q).await
    }

    /// Link a step to a concept it applies
    pub async fn link_step_concept(&self, step_id: &str, concept: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (st:Step {id: $step_id})
            MATCH (c:Concept {name: $concept})
            MERGE (st)-[:APPLIES_CONCEPT]->(c)
            RETURN count(*) AS linked
            "#,
        )
        .param("step_id", step_id)
        .param("concept", concept);

        self.run_link(q).await
    }

    /// Find the stored solution for a problem whose text matches exactly.
    ///
    /// When several solutions hang off the problem, the smallest id wins.
    pub async fn find_solution_by_problem_text(
        &self,
        text: &str,
    ) -> Result<Option<SolutionDetails>> {
        let q = query(
            r#"
            MATCH (p:Problem {text: $text})-[:HAS_SOLUTION]->(s:Solution)
            RETURN s
            ORDER BY s.id
            LIMIT 1
            "#,
        )
        .param("text", text);

        let rows = self.execute_with_params(q).await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let node: neo4rs::Node = row.get("s")?;
        let solution = SolutionNode {
            id: node.get("id")?,
            problem_id: node.get("problem_id").unwrap_or_default(),
            source: node.get("source").unwrap_or_default(),
            date: node.get("date").unwrap_or_default(),
        };

        let q = query(
            r#"
            MATCH (s:Solution {id: $solution_id})-[:HAS_STEP]->(st:Step)
            OPTIONAL MATCH (st)-[:APPLIES_CONCEPT]->(c:Concept)
            WITH st, c ORDER BY c.name
            RETURN st, collect(c.name) AS concepts
            ORDER BY st.step_number
            "#,
        )
        .param("solution_id", solution.id.clone());

        let rows = self.execute_with_params(q).await?;
        let mut steps = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("st")?;
            steps.push(StepDetails {
                step: self.node_to_step(&node)?,
                applies_concepts: row.get::<Vec<String>>("concepts").unwrap_or_default(),
            });
        }

        Ok(Some(SolutionDetails { solution, steps }))
    }

    fn node_to_step(&self, node: &neo4rs::Node) -> Result<StepNode> {
        Ok(StepNode {
            id: node.get("id")?,
            step_number: node.get("step_number").unwrap_or_default(),
            step_explanation: node.get("step_explanation").unwrap_or_default(),
            math_transformation: node.get("math_transformation").unwrap_or_default(),
            related_concepts: node
                .get::<String>("related_concepts")
                .map(|raw| decode_related_concepts(&raw))
                .unwrap_or_default(),
        })
    }
}
