use serde_json::json;
use threadmark_core::state::AppContext;
use threadmark_core::tools::render_heading_definition;

#[tokio::test]
async fn converts_a_single_heading_line() {
    let context = AppContext::new();
    let (_definition, handler) = render_heading_definition();

    let response = handler(context, json!({"line": "## Release notes"}))
        .await
        .expect("handler should succeed");

    insta::assert_snapshot!(response.content[0].text, @"<h2>Release notes</h2>");
    assert_eq!(
        response.metadata,
        Some(json!({"converted": 1, "unchanged": 0}))
    );
}

#[tokio::test]
async fn batch_lines_convert_independently() {
    let context = AppContext::new();
    let (_definition, handler) = render_heading_definition();

    let response = handler(
        context.clone(),
        json!({
            "lines": [
                "# This is a first-level (`<h1>`) header #",
                "##Invalid",
                "###### Header",
                "####### too many",
                ""
            ]
        }),
    )
    .await
    .expect("handler should succeed");

    let text = &response.content[0].text;
    let rendered: Vec<&str> = text.split('\n').collect();
    assert_eq!(
        rendered,
        [
            "<h1>This is a first-level (`<h1>`) header</h1>",
            "##Invalid",
            "<h6>Header</h6>",
            "####### too many",
            ""
        ]
    );
    assert_eq!(
        response.metadata,
        Some(json!({"converted": 2, "unchanged": 3}))
    );
}

#[tokio::test]
async fn repeated_calls_are_served_from_the_render_cache() {
    let context = AppContext::new();
    let (_definition, handler) = render_heading_definition();

    for _ in 0..3 {
        handler(context.clone(), json!({"line": "# cached"}))
            .await
            .expect("handler should succeed");
    }

    let snapshot = context.state.render_cache.snapshot();
    assert_eq!(snapshot.misses, 1);
    assert_eq!(snapshot.hits, 2);
    assert_eq!(snapshot.entries, 1);
}

#[tokio::test]
async fn rejects_ambiguous_and_empty_arguments() {
    let context = AppContext::new();
    let (_definition, handler) = render_heading_definition();

    let both = handler(
        context.clone(),
        json!({"line": "# a", "lines": ["# b"]}),
    )
    .await;
    assert!(both.is_err());

    let neither = handler(context, json!({})).await;
    assert!(neither.is_err());
}
