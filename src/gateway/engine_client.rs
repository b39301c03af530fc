//! Client for the generation engine's `/solve` endpoint

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Failure of a generation request
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The engine answered with a non-success status
    #[error("Solution engine returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The engine could not be reached
    #[error("Solution engine unreachable: {message}")]
    Transport { message: String },

    /// The engine's response body could not be read
    #[error("Invalid response from solution engine: {message}")]
    InvalidResponse { message: String },
}

/// Anything that can turn a problem statement into a generated solution
#[async_trait]
pub trait EngineClient: Send + Sync {
    async fn generate(&self, problem: &str) -> Result<Value, GenerationError>;
}

#[derive(Debug, Serialize)]
struct SolveRequest<'a> {
    problem: &'a str,
    stream: bool,
}

/// HTTP engine client.
///
/// Cheaply cloneable (shares the reqwest client internally).
#[derive(Clone)]
pub struct HttpEngineClient {
    client: reqwest::Client,
    url: String,
}

impl HttpEngineClient {
    /// `url` is the full solve endpoint, e.g. `http://localhost:8000/solve`
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EngineClient for HttpEngineClient {
    async fn generate(&self, problem: &str) -> Result<Value, GenerationError> {
        let response = self
            .client
            .post(&self.url)
            .json(&SolveRequest {
                problem,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| GenerationError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::InvalidResponse {
                message: e.to_string(),
            })?;

        // Only 200 carries a solution
        if status != reqwest::StatusCode::OK {
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(interpret_body(body))
    }
}

/// `{"solution": x}` yields `x`, other JSON is kept whole, anything else is text
fn interpret_body(body: String) -> Value {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(mut map)) => match map.remove("solution") {
            Some(solution) => solution,
            None => Value::Object(map),
        },
        Ok(other) => other,
        Err(_) => Value::String(body),
    }
}
