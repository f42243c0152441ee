use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::executor::{ToolExecutor, ToolExecutorError};

/// Line-delimited JSON request loop over stdio.
///
/// One request per line, one reply per line. EOF ends the loop. All calls go
/// through the executor so transport traffic shows up in telemetry.
pub async fn serve_stdio(executor: ToolExecutor) -> Result<()> {
    let mut reader = BufReader::new(io::stdin());
    let mut writer = io::stdout();

    let mut buffer = String::new();
    loop {
        buffer.clear();
        let bytes = reader.read_line(&mut buffer).await?;
        if bytes == 0 {
            info!(target: "threadmark_transport", "stdin closed; shutting down");
            break;
        }
        if buffer.trim().is_empty() {
            continue;
        }

        debug!(target: "threadmark_transport", request = buffer.trim());
        let reply = match serde_json::from_str::<Request>(&buffer) {
            Ok(request) => dispatch(&executor, request).await,
            Err(error) => {
                warn!(target: "threadmark_transport", error = %error, "failed to parse request");
                Reply::failure(None, format!("malformed request: {error}"))
            }
        };

        let payload = serde_json::to_string(&reply)?;
        writer.write_all(payload.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct Request {
    id: Option<Value>,
    op: String,
    name: Option<String>,
    arguments: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Reply {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Reply {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(message.into()),
        }
    }
}

async fn dispatch(executor: &ToolExecutor, request: Request) -> Reply {
    match request.op.as_str() {
        "list" => {
            let definitions = executor.list_tools().await;
            match serde_json::to_value(definitions) {
                Ok(value) => Reply::success(request.id, serde_json::json!({"tools": value})),
                Err(error) => Reply::failure(request.id, error.to_string()),
            }
        }
        "call" => {
            let Some(name) = request.name else {
                return Reply::failure(request.id, "missing tool name");
            };
            let arguments = request
                .arguments
                .unwrap_or_else(|| Value::Object(Default::default()));
            match executor.call_tool(&name, arguments).await {
                Ok(response) => match serde_json::to_value(response) {
                    Ok(value) => Reply::success(request.id, value),
                    Err(error) => Reply::failure(request.id, error.to_string()),
                },
                Err(error @ ToolExecutorError::UnknownTool(_)) => {
                    Reply::failure(request.id, error.to_string())
                }
                Err(ToolExecutorError::Execution { name, source }) => {
                    Reply::failure(request.id, format!("tool `{name}` failed: {source}"))
                }
            }
        }
        other => Reply::failure(request.id, format!("unknown op: {other}")),
    }
}
