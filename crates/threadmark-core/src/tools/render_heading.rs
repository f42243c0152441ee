use anyhow::{bail, Result};
use serde::Deserialize;

use crate::{
    heading,
    state::{AppContext, ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, text_response, wrap_handler},
};

#[derive(Debug, Deserialize)]
struct Args {
    line: Option<String>,
    lines: Option<Vec<String>>,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "render_heading".to_string(),
            description: "Convert ATX heading lines to HTML; non-heading lines pass through unchanged".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "line": {"type": "string", "description": "A single line to convert"},
                    "lines": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Several lines, converted independently"
                    }
                }
            }),
        },
        wrap_handler(|context, value| async move {
            let args: Args = parse_args(value)?;
            handle(context, args)
        }),
    )
}

fn handle(context: AppContext, args: Args) -> Result<ToolResponse> {
    let lines = match (args.line, args.lines) {
        (Some(line), None) => vec![line],
        (None, Some(lines)) => lines,
        (Some(_), Some(_)) => bail!("pass either `line` or `lines`, not both"),
        (None, None) => bail!("missing `line` or `lines`"),
    };

    let mut converted = 0usize;
    let mut unchanged = 0usize;
    let rendered: Vec<String> = lines
        .iter()
        .map(|line| {
            if heading::is_heading(line) {
                converted += 1;
            } else {
                unchanged += 1;
            }
            context.state.render_cache.convert(line)
        })
        .collect();

    Ok(text_response(rendered).with_metadata(serde_json::json!({
        "converted": converted,
        "unchanged": unchanged,
    })))
}
