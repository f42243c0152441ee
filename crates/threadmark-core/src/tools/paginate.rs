use anyhow::Result;
use serde::Deserialize;

use crate::{
    markdown,
    pagination::{Pager, OUT_OF_RANGE},
    state::{ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, text_response, wrap_handler},
};

#[derive(Debug, Deserialize)]
struct Args {
    items: Vec<String>,
    #[serde(rename = "pageSize")]
    page_size: usize,
    page: Option<i64>,
    #[serde(rename = "itemIndex")]
    item_index: Option<i64>,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "paginate".to_string(),
            description:
                "Answer page-layout queries over a fixed item sequence: counts, a single page, or the item-to-page mapping"
                    .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "required": ["items", "pageSize"],
                "properties": {
                    "items": {"type": "array", "items": {"type": "string"}},
                    "pageSize": {"type": "number", "minimum": 1},
                    "page": {"type": "number", "description": "Zero-based page to list"},
                    "itemIndex": {
                        "type": "number",
                        "description": "Item index whose page number is wanted"
                    }
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
    let pager = Pager::new(args.items, args.page_size)?;

    let mut lines = vec![
        markdown::header(1, "Pagination Report"),
        markdown::blank_line(),
        markdown::bold("Items", &pager.item_count().to_string()),
        markdown::bold("Page size", &pager.page_size().to_string()),
        markdown::bold("Pages", &pager.page_count().to_string()),
        markdown::blank_line(),
    ];

    if let Some(item_index) = args.item_index {
        match pager.page_index(item_index) {
            OUT_OF_RANGE => lines.push(format!("Item {item_index} is out of range.")),
            page => lines.push(format!("Item {item_index} sits on page {page}.")),
        }
        lines.push(markdown::blank_line());
    }

    match args.page {
        Some(page) => append_page(&mut lines, &pager, page),
        None => {
            for page in 0..pager.page_count() {
                append_page(&mut lines, &pager, page);
            }
        }
    }

    let metadata = serde_json::json!({
        "pages": pager.page_count(),
        "items": pager.item_count(),
    });
    Ok(text_response(lines).with_metadata(metadata))
}

fn append_page(lines: &mut Vec<String>, pager: &Pager<String>, page: i64) {
    match pager.page_slice(page) {
        Some(slice) => {
            lines.push(markdown::header(2, &format!("Page {page}")));
            lines.push(markdown::bold(
                "Count",
                &pager.page_item_count(page).to_string(),
            ));
            for item in slice {
                lines.push(markdown::bullet(item));
            }
            lines.push(markdown::blank_line());
        }
        None => {
            lines.push(format!("Page {page} is out of range."));
            lines.push(markdown::blank_line());
        }
    }
}
