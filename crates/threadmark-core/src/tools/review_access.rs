use anyhow::Result;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    markdown,
    moderation::{can_delete, can_edit, Comment, Role},
    state::{ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, text_response, wrap_handler},
};

#[derive(Debug, Deserialize)]
struct Args {
    actor: String,
    role: Role,
    author: String,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "review_access".to_string(),
            description: "Report whether an actor may edit or delete a comment by the given author"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "required": ["actor", "role", "author"],
                "properties": {
                    "actor": {"type": "string"},
                    "role": {"type": "string", "enum": ["member", "moderator", "admin"]},
                    "author": {"type": "string"}
                }
            }),
        },
        wrap_handler(|_context, value| async move {
            let args: Args = parse_args(value)?;
            handle(args)
        }),
    )
}

fn handle(args: Args) -> Result<ToolResponse> {
    // The checks only look at authorship, so a placeholder comment carries
    // everything the predicates need.
    let comment = Comment::new(&args.author, "", OffsetDateTime::UNIX_EPOCH);
    let edit = can_edit(&args.actor, args.role, &comment);
    let delete = can_delete(&args.actor, args.role, &comment);

    let lines = vec![
        markdown::header(1, "Access Review"),
        markdown::blank_line(),
        markdown::bold("Actor", &args.actor),
        markdown::bold("Role", &format!("{:?}", args.role).to_lowercase()),
        markdown::bold("Comment author", &args.author),
        markdown::blank_line(),
        markdown::bullet(&format!("Edit: {}", verdict(edit))),
        markdown::bullet(&format!("Delete: {}", verdict(delete))),
    ];

    let metadata = serde_json::json!({
        "canEdit": edit,
        "canDelete": delete,
    });
    Ok(text_response(lines).with_metadata(metadata))
}

fn verdict(allowed: bool) -> &'static str {
    if allowed {
        "allowed"
    } else {
        "denied"
    }
}
