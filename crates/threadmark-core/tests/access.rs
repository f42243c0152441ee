use serde_json::json;
use threadmark_core::state::AppContext;
use threadmark_core::tools::review_access_definition;

async fn review(role: &str, actor: &str, author: &str) -> (bool, bool) {
    let context = AppContext::new();
    let (_definition, handler) = review_access_definition();
    let response = handler(
        context,
        json!({"actor": actor, "role": role, "author": author}),
    )
    .await
    .expect("handler should succeed");

    let metadata = response.metadata.expect("metadata is always attached");
    (
        metadata["canEdit"].as_bool().expect("canEdit is a bool"),
        metadata["canDelete"].as_bool().expect("canDelete is a bool"),
    )
}

#[tokio::test]
async fn members_are_limited_to_their_own_comments() {
    assert_eq!(review("member", "ada", "ada").await, (true, true));
    assert_eq!(review("member", "ada", "grace").await, (false, false));
}

#[tokio::test]
async fn moderators_may_delete_any_comment() {
    assert_eq!(review("moderator", "ada", "grace").await, (false, true));
    assert_eq!(review("moderator", "ada", "ada").await, (true, true));
}

#[tokio::test]
async fn admins_may_edit_and_delete_any_comment() {
    assert_eq!(review("admin", "ada", "grace").await, (true, true));
}

#[tokio::test]
async fn report_text_states_both_verdicts() {
    let context = AppContext::new();
    let (_definition, handler) = review_access_definition();
    let response = handler(
        context,
        json!({"actor": "ada", "role": "moderator", "author": "grace"}),
    )
    .await
    .expect("handler should succeed");

    insta::assert_snapshot!(response.content[0].text, @r"
    # Access Review

    **Actor:** ada
    **Role:** moderator
    **Comment author:** grace

    • Edit: denied
    • Delete: allowed
    ");
}

#[tokio::test]
async fn unknown_roles_are_rejected() {
    let context = AppContext::new();
    let (_definition, handler) = review_access_definition();
    let error = handler(
        context,
        json!({"actor": "ada", "role": "janitor", "author": "grace"}),
    )
    .await
    .expect_err("unknown role must fail argument parsing");
    assert!(error.to_string().contains("invalid arguments"));
}
