#![cfg(not(coverage))]

use super::test_support::mock::*;
use super::*;
use crate::test_support::helpers::{jpeg, login_json, story_json, story_list_json};
use crate::utils::{
    geo::Coordinates,
    storage::{KeyValueStore, MemoryStorage},
};
use serde_json::json;
use std::rc::Rc;

fn client_for(server: &MockServer) -> (ApiClient, Rc<MemoryStorage>) {
    let storage = Rc::new(MemoryStorage::new());
    let client = ApiClient::new_with_base_url(server.url("/v1"), storage.clone());
    (client, storage)
}

fn upload(location: Option<Coordinates>) -> StoryUpload {
    StoryUpload {
        description: "Sore yang cerah di Monas".into(),
        photo: jpeg(2048),
        location,
    }
}

#[tokio::test]
async fn login_stores_token_and_returns_profile() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/v1/login");
        then.status(200)
            .json_body(login_json("user-1", "Arif Faizin", "token-abc"));
    });
    let (client, storage) = client_for(&server);

    let response = client
        .login(LoginRequest {
            email: "arif@example.com".into(),
            password: "Rahasia#123".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.login_result.name, "Arif Faizin");
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("token-abc"));
    assert!(client.has_token());

    client.logout();
    assert!(storage.get(TOKEN_KEY).is_none());
}

#[tokio::test]
async fn login_failure_uses_server_message() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/v1/login");
        then.status(401)
            .json_body(json!({"error": true, "message": "Invalid password"}));
    });
    let (client, storage) = client_for(&server);

    let err = client
        .login(LoginRequest {
            email: "arif@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.error, "Invalid password");
    assert!(err.is_unauthorized());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn register_posts_payload_and_reports_message() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/v1/register");
        then.status(201)
            .json_body(json!({"error": false, "message": "User created"}));
    });
    let (client, _) = client_for(&server);

    let response = client
        .register(RegisterRequest {
            name: "Arif".into(),
            email: "arif@example.com".into(),
            password: "Rahasia#123".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.message, "User created");
    assert_eq!(server.hits(POST, "/v1/register"), 1);
}

#[tokio::test]
async fn error_without_json_body_falls_back_to_status_text() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/v1/register");
        then.status(500).json_body(serde_json::Value::Null);
    });
    let (client, _) = client_for(&server);

    let err = client
        .register(RegisterRequest {
            name: "Arif".into(),
            email: "arif@example.com".into(),
            password: "Rahasia#123".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.error, "HTTP 500");
    assert_eq!(err.status, Some(500));
}

#[tokio::test]
async fn authenticated_list_sends_bearer_and_paging() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/v1/stories");
        then.status(200).json_body(story_list_json(&["s1", "s2"]));
    });
    let (client, storage) = client_for(&server);
    storage.set(TOKEN_KEY, "token-abc").unwrap();

    let stories = client
        .list_stories(StoryListQuery::first_page(50))
        .await
        .unwrap();

    assert_eq!(stories.len(), 2);
    let sent = server.received();
    assert_eq!(sent[0].authorization.as_deref(), Some("Bearer token-abc"));
    assert_eq!(sent[0].query.as_deref(), Some("page=1&size=50&location=1"));
}

#[tokio::test]
async fn authenticated_list_without_token_fails_before_sending() {
    let server = MockServer::start_async().await;
    let (client, _) = client_for(&server);

    let err = client
        .list_stories(StoryListQuery::first_page(50))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(server.received().is_empty());
}

#[tokio::test]
async fn anonymous_list_omits_authorization() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/v1/stories");
        then.status(200).json_body(story_list_json(&["s1"]));
    });
    let (client, storage) = client_for(&server);
    storage.set(TOKEN_KEY, "token-abc").unwrap();

    let stories = client
        .list_stories_anonymous(StoryListQuery::first_page(10))
        .await
        .unwrap();

    assert_eq!(stories.len(), 1);
    assert!(server.received()[0].authorization.is_none());
}

#[tokio::test]
async fn get_story_decodes_detail_envelope() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/v1/stories/story-42");
        then.status(200).json_body(json!({
            "error": false,
            "message": "Story fetched successfully",
            "story": story_json("story-42", "Dimas")
        }));
    });
    let (client, storage) = client_for(&server);
    storage.set(TOKEN_KEY, "token-abc").unwrap();

    let story = client.get_story("story-42").await.unwrap();
    assert_eq!(story.id, "story-42");
    assert!(story.has_location());
}

#[tokio::test]
async fn add_story_uses_bearer_and_multipart() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/v1/stories");
        then.status(201)
            .json_body(json!({"error": false, "message": "Story created successfully"}));
    });
    let (client, storage) = client_for(&server);
    storage.set(TOKEN_KEY, "token-abc").unwrap();

    let response = client
        .add_story(&upload(Some(Coordinates::new(-6.2, 106.8))))
        .await
        .unwrap();

    assert_eq!(response.message, "Story created successfully");
    let sent = &server.received()[0];
    assert_eq!(sent.authorization.as_deref(), Some("Bearer token-abc"));
    assert!(sent
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("multipart/form-data"));
}

#[tokio::test]
async fn guest_story_goes_to_guest_endpoint_without_token() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/v1/stories/guest");
        then.status(201)
            .json_body(json!({"error": false, "message": "Story created successfully"}));
    });
    let (client, _) = client_for(&server);

    client.add_guest_story(&upload(None)).await.unwrap();

    assert_eq!(server.hits(POST, "/v1/stories/guest"), 1);
    assert!(server.received()[0].authorization.is_none());
}

#[tokio::test]
async fn missing_route_is_reported_as_request_failure() {
    let server = MockServer::start_async().await;
    let (client, _) = client_for(&server);

    let err = client
        .list_stories_anonymous(StoryListQuery::first_page(50))
        .await
        .unwrap_err();

    assert!(err.is_network());
}
