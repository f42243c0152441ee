use std::time::Instant;

use anyhow::Result;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::state::{AppContext, TelemetryEntry, ToolDefinition, ToolResponse};

/// Resolves tools by name, times each call, and records the outcome.
#[derive(Clone)]
pub struct ToolExecutor {
    context: AppContext,
    record_telemetry: bool,
}

#[derive(Clone)]
pub struct ToolExecutorBuilder {
    context: AppContext,
    record_telemetry: bool,
}

impl ToolExecutorBuilder {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            record_telemetry: true,
        }
    }

    #[must_use]
    pub fn record_telemetry(mut self, enabled: bool) -> Self {
        self.record_telemetry = enabled;
        self
    }

    pub fn build(self) -> ToolExecutor {
        ToolExecutor {
            context: self.context,
            record_telemetry: self.record_telemetry,
        }
    }
}

impl ToolExecutor {
    pub fn builder(context: AppContext) -> ToolExecutorBuilder {
        ToolExecutorBuilder::new(context)
    }

    pub fn context(&self) -> AppContext {
        self.context.clone()
    }

    pub async fn list_tools(&self) -> Vec<ToolDefinition> {
        self.context.tools.definitions().await
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolResponse, ToolExecutorError> {
        let Some(entry) = self.context.tools.get(name).await else {
            return Err(ToolExecutorError::UnknownTool(name.to_string()));
        };

        let handler = entry.handler.clone();
        let started = Instant::now();
        match handler(self.context.clone(), arguments).await {
            Ok(response) => {
                if self.record_telemetry {
                    self.record_success(name, started.elapsed().as_millis() as u64, &response)
                        .await;
                }
                Ok(response)
            }
            Err(source) => {
                if self.record_telemetry {
                    self.record_failure(
                        name,
                        started.elapsed().as_millis() as u64,
                        source.to_string(),
                    )
                    .await;
                }
                Err(ToolExecutorError::Execution {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }

    async fn record_success(&self, name: &str, latency_ms: u64, response: &ToolResponse) {
        let metadata = response.metadata.clone();
        self.context
            .record_telemetry(TelemetryEntry {
                tool: name.to_string(),
                timestamp: OffsetDateTime::now_utc(),
                latency_ms,
                success: true,
                metadata,
                error: None,
            })
            .await;
        info!(
            target: "threadmark_executor",
            tool = %name,
            latency_ms,
            "tool completed"
        );
    }

    async fn record_failure(&self, name: &str, latency_ms: u64, message: String) {
        self.context
            .record_telemetry(TelemetryEntry {
                tool: name.to_string(),
                timestamp: OffsetDateTime::now_utc(),
                latency_ms,
                success: false,
                metadata: None,
                error: Some(message.clone()),
            })
            .await;
        warn!(
            target: "threadmark_executor",
            tool = %name,
            latency_ms,
            error = %message,
            "tool failed"
        );
    }
}

#[derive(Debug, Error)]
pub enum ToolExecutorError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("tool `{name}` failed: {source}")]
    Execution {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::state::{ToolContent, ToolEntry, ToolFuture};

    fn echo_entry() -> ToolEntry {
        let handler = Arc::new(|_ctx: AppContext, value: Value| -> ToolFuture {
            Box::pin(async move {
                let message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(ToolResponse {
                    content: vec![ToolContent {
                        r#type: "text".to_string(),
                        text: message,
                    }],
                    metadata: None,
                })
            })
        });
        ToolEntry {
            definition: ToolDefinition {
                name: "echo".to_string(),
                description: "Echo back a message".to_string(),
                input_schema: json!({}),
            },
            handler,
        }
    }

    #[tokio::test]
    async fn executor_invokes_registered_tool() {
        let context = AppContext::new();
        context.tools.insert(echo_entry()).await;

        let executor = ToolExecutor::builder(context.clone()).build();
        let response = executor
            .call_tool("echo", json!({"message": "hello"}))
            .await
            .expect("tool succeeds");

        assert_eq!(response.content.len(), 1);
        assert_eq!(response.content[0].text, "hello");

        let telemetry = context.telemetry_snapshot().await;
        assert_eq!(telemetry.len(), 1);
        assert!(telemetry[0].success);
    }

    #[tokio::test]
    async fn executor_reports_unknown_tool() {
        let executor = ToolExecutor::builder(AppContext::new()).build();
        let error = executor
            .call_tool("missing", Value::Null)
            .await
            .expect_err("unknown tool should fail");
        assert!(error.to_string().contains("unknown tool"));
    }

    #[tokio::test]
    async fn telemetry_can_be_disabled() {
        let context = AppContext::new();
        context.tools.insert(echo_entry()).await;

        let executor = ToolExecutor::builder(context.clone())
            .record_telemetry(false)
            .build();
        executor
            .call_tool("echo", json!({"message": "quiet"}))
            .await
            .expect("tool succeeds");

        assert!(context.telemetry_snapshot().await.is_empty());
    }
}
