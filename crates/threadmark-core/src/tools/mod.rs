use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::state::{AppContext, ToolContent, ToolEntry, ToolHandler, ToolResponse};

mod paginate;
mod render_heading;
mod review_access;

pub async fn register_tools(context: &AppContext) {
    let tools = [
        render_heading::definition(),
        paginate::definition(),
        review_access::definition(),
    ];

    for (definition, handler) in tools {
        context
            .tools
            .insert(ToolEntry {
                definition,
                handler,
            })
            .await;
    }
}

pub(crate) fn text_response(lines: impl IntoIterator<Item = String>) -> ToolResponse {
    ToolResponse {
        content: vec![ToolContent {
            r#type: "text".to_string(),
            text: lines.into_iter().collect::<Vec<_>>().join("\n"),
        }],
        metadata: None,
    }
}

pub(crate) fn wrap_handler<F, Fut>(handler: F) -> ToolHandler
where
    F: Fn(AppContext, serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<ToolResponse>> + Send + 'static,
{
    Arc::new(move |context, value| Box::pin(handler(context, value)))
}

pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|error| anyhow!("invalid arguments: {error}"))
}

pub use paginate::definition as paginate_definition;
pub use render_heading::definition as render_heading_definition;
pub use review_access::definition as review_access_definition;
