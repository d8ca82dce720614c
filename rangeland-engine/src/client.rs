//! Synchronous HTTP client for the engine's compute endpoint.

use log::{debug, info};
use serde::Serialize;

use crate::error::EngineError;
use crate::expression::Expr;

const DEFAULT_ENDPOINT: &str = "https://earthengine.googleapis.com/v1";

/// Client for submitting expressions to the engine.
///
/// The client is synchronous: every call blocks until the engine has
/// evaluated the expression and returned its value. There is no retry
/// logic; transport errors surface as [`EngineError::Http`].
#[derive(Debug, Clone)]
pub struct EngineClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    project: String,
    token: Option<String>,
}

/// Builder for [`EngineClient`].
#[derive(Debug, Default)]
pub struct EngineClientBuilder {
    endpoint: Option<String>,
    project: Option<String>,
    token: Option<String>,
}

#[derive(Serialize)]
struct ComputeRequest<'a> {
    expression: &'a Expr,
}

impl EngineClientBuilder {
    /// Overrides the default endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the cloud project the computations are billed to.
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Sets the OAuth bearer token sent with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<EngineClient, EngineError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("rangeland/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(EngineClient {
            http,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            project: self.project.unwrap_or_else(|| "default".to_string()),
            token: self.token,
        })
    }
}

impl EngineClient {
    /// Starts building a client.
    pub fn builder() -> EngineClientBuilder {
        EngineClientBuilder::default()
    }

    /// Submits the expression for evaluation and returns the computed value.
    pub fn compute(&self, expr: &Expr) -> Result<serde_json::Value, EngineError> {
        let url = format!("{}/projects/{}/value:compute", self.endpoint, self.project);
        debug!("compute: {}", summarize(expr));

        let mut request = self.http.post(&url).json(&ComputeRequest { expression: expr });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            info!("compute request to {url} failed: {status}, {message}");
            return Err(EngineError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json()?)
    }
}

fn summarize(expr: &Expr) -> String {
    let ops = expr.ops();
    if ops.is_empty() {
        "<constant>".to_string()
    } else {
        ops.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn compute_request_body() {
        let expr = Expr::invoke("Geometry.centroid")
            .arg("geometry", Expr::constant(json!({"type": "Point", "coordinates": [0.0, 0.0]})))
            .build();

        let body = serde_json::to_value(ComputeRequest { expression: &expr })
            .expect("serialization failed");
        assert_eq!(
            body["expression"]["functionInvocationValue"]["functionName"],
            "Geometry.centroid"
        );
    }

    #[test]
    fn builder_defaults() {
        let client = EngineClient::builder()
            .project("grassland-monitoring")
            .build()
            .expect("client construction failed");
        assert_eq!(client.project, "grassland-monitoring");
        assert_eq!(client.endpoint, DEFAULT_ENDPOINT);
        assert!(client.token.is_none());
    }
}
