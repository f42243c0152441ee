use anyhow::Result;

pub mod cache;
pub mod executor;
pub mod heading;
pub mod markdown;
pub mod moderation;
pub mod pagination;
pub mod state;
pub mod tools;
pub mod transport;

use state::AppContext;
use time::OffsetDateTime;
use tracing::info;

/// Configuration inputs required to bootstrap the service core.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Timestamp captured during process initialization for diagnostics.
    pub boot_timestamp: OffsetDateTime,
    /// How the service receives requests.
    pub mode: ServiceMode,
    /// Whether tool calls are recorded in the telemetry log.
    pub record_telemetry: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    Stdio,
    Headless,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            boot_timestamp: OffsetDateTime::now_utc(),
            mode: ServiceMode::Stdio,
            record_telemetry: true,
        }
    }
}

#[derive(Clone)]
pub struct CoreRuntime {
    config: ServiceConfig,
    executor: executor::ToolExecutor,
}

impl CoreRuntime {
    pub fn executor(&self) -> executor::ToolExecutor {
        self.executor.clone()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub async fn serve(&self) -> Result<()> {
        match self.config.mode {
            ServiceMode::Stdio => transport::serve_stdio(self.executor.clone()).await?,
            ServiceMode::Headless => {
                info!(target: "threadmark_core", "headless mode: skipping transport loop");
            }
        }
        Ok(())
    }
}

pub async fn bootstrap(config: ServiceConfig) -> Result<CoreRuntime> {
    let context = AppContext::new();
    tools::register_tools(&context).await;

    info!(
        target: "threadmark_core",
        boot_timestamp = %config.boot_timestamp,
        mode = ?config.mode,
        "core service starting"
    );

    let executor = executor::ToolExecutor::builder(context)
        .record_telemetry(config.record_telemetry)
        .build();
    Ok(CoreRuntime { config, executor })
}

pub async fn run(config: ServiceConfig) -> Result<()> {
    bootstrap(config).await?.serve().await
}

pub use executor::{ToolExecutor, ToolExecutorBuilder, ToolExecutorError};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn headless_run_completes() {
        let config = ServiceConfig {
            mode: ServiceMode::Headless,
            ..ServiceConfig::default()
        };
        let runtime = bootstrap(config).await.expect("bootstrap succeeds");
        assert!(runtime.serve().await.is_ok());
    }

    #[tokio::test]
    async fn bootstrap_registers_the_tool_surface() {
        let runtime = bootstrap(ServiceConfig::default())
            .await
            .expect("bootstrap succeeds");
        let names: Vec<String> = runtime
            .executor()
            .list_tools()
            .await
            .into_iter()
            .map(|definition| definition.name)
            .collect();
        assert_eq!(names, ["paginate", "render_heading", "review_access"]);
    }
}
