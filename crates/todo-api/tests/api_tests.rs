use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use domain::{Todo, TodoId, TodoUpdate};
use infrastructure::{InMemoryTodoRepository, StoreError, TodoRepository};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use todo_api::{app, AppState};
use tower::ServiceExt; // for `oneshot`

fn test_app() -> (Router, Arc<InMemoryTodoRepository>) {
    let repo = Arc::new(InMemoryTodoRepository::new());
    let router = app(AppState::new(repo.clone()));
    (router, repo)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn create(app: &Router, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/v2/todos", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn get_health_returns_ok() {
    let (app, _) = test_app();

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn create_returns_201_with_full_record() {
    let (app, repo) = test_app();

    let json = create(&app, json!({"title": "Buy milk"})).await;

    let id = json["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(json["title"], "Buy milk");
    assert_eq!(json["completed"], false);
    assert_eq!(json["createdAt"], json["updatedAt"]);

    // ストアに put が 1 回だけ届いたことを検証
    let puts = repo.put_calls();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].id.as_str(), id);
}

#[tokio::test]
async fn created_ids_are_unique() {
    let (app, _) = test_app();
    let mut ids = HashSet::new();

    for i in 0..20 {
        let json = create(&app, json!({"title": format!("todo {i}")})).await;
        ids.insert(json["id"].as_str().unwrap().to_string());
    }

    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let (app, _) = test_app();
    let created = create(&app, json!({"title": "Buy milk"})).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(empty_request("GET", &format!("/v2/todos/{id}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Buy milk");
    assert_eq!(json["completed"], false);
    assert_eq!(json, created);
}

#[tokio::test]
async fn get_unknown_id_returns_exact_404_body() {
    let (app, _) = test_app();

    let response = app
        .oneshot(empty_request("GET", "/v2/todos/does-not-exist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Todo not found"})
    );
}

#[tokio::test]
async fn update_without_completed_resets_it_to_false() {
    let (app, _) = test_app();
    let created = create(&app, json!({"title": "A", "completed": true})).await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["completed"], true);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/v2/todos/{id}"),
            json!({"title": "B"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "B");
    assert_eq!(updated["completed"], false);
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let response = app
        .oneshot(empty_request("GET", &format!("/v2/todos/{id}")))
        .await
        .unwrap();
    let fetched = body_json(response).await;
    assert_eq!(fetched["title"], "B");
    assert_eq!(fetched["completed"], false);
}

#[tokio::test]
async fn update_of_unknown_id_creates_partial_record() {
    let (app, repo) = test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/v2/todos/ghost",
            json!({"title": "Ghost", "completed": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], "ghost");
    assert_eq!(json["completed"], true);
    assert!(json.get("createdAt").is_none());
    assert!(json.get("updatedAt").is_some());
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn delete_twice_returns_204_both_times() {
    let (app, repo) = test_app();
    let created = create(&app, json!({"title": "A"})).await;
    let uri = format!("/v2/todos/{}", created["id"].as_str().unwrap());

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_bytes(response).await.is_empty());
    }

    assert!(repo.is_empty());
}

#[tokio::test]
async fn list_returns_all_created_records() {
    let (app, _) = test_app();
    let a = create(&app, json!({"title": "A"})).await;
    let b = create(&app, json!({"title": "B"})).await;

    let response = app.oneshot(empty_request("GET", "/v2/todos")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let list: Vec<Todo> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let ids: HashSet<String> = list.into_iter().map(|t| t.id.0).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(a["id"].as_str().unwrap()));
    assert!(ids.contains(b["id"].as_str().unwrap()));
}

#[tokio::test]
async fn list_of_empty_table_is_empty_array() {
    let (app, _) = test_app();

    let response = app.oneshot(empty_request("GET", "/v2/todos")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn create_with_missing_title_is_rejected_before_store() {
    let (app, repo) = test_app();

    let response = app
        .oneshot(json_request("POST", "/v2/todos", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Missing required field: title"
    );
    assert!(repo.put_calls().is_empty());
}

#[tokio::test]
async fn create_with_wrong_types_is_rejected() {
    let (app, repo) = test_app();

    for body in [
        json!({"title": 1}),
        json!({"title": "A", "completed": "yes"}),
        json!(["A"]),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/v2/todos", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["message"].is_string());
    }

    assert!(repo.put_calls().is_empty());
}

#[tokio::test]
async fn create_with_malformed_json_is_rejected() {
    let (app, repo) = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/v2/todos")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\":"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(repo.put_calls().is_empty());
}

#[tokio::test]
async fn update_with_missing_title_is_rejected() {
    let (app, repo) = test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/v2/todos/some-id",
            json!({"completed": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(repo.is_empty());
}

#[tokio::test]
async fn empty_title_is_accepted() {
    let (app, _) = test_app();

    let json = create(&app, json!({"title": ""})).await;

    assert_eq!(json["title"], "");
}

#[tokio::test]
async fn store_failure_returns_generic_500() {
    let repo = Arc::new(InMemoryTodoRepository::failing(
        "AccessDeniedException: not authorized",
    ));
    let app = app(AppState::new(repo));

    for request in [
        empty_request("GET", "/v2/todos"),
        empty_request("GET", "/v2/todos/abc"),
        json_request("POST", "/v2/todos", json!({"title": "A"})),
        json_request("PUT", "/v2/todos/abc", json!({"title": "A"})),
        empty_request("DELETE", "/v2/todos/abc"),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Internal server error"})
        );
    }
}

struct PanickingRepository;

#[async_trait]
impl TodoRepository for PanickingRepository {
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError> {
        panic!("unexpected scan state")
    }

    async fn get_todo(&self, _id: &TodoId) -> Result<Option<Todo>, StoreError> {
        panic!("unexpected get state")
    }

    async fn put_todo(&self, _todo: &Todo) -> Result<(), StoreError> {
        panic!("unexpected put state")
    }

    async fn update_todo(&self, _id: &TodoId, _update: &TodoUpdate) -> Result<Todo, StoreError> {
        panic!("unexpected update state")
    }

    async fn delete_todo(&self, _id: &TodoId) -> Result<(), StoreError> {
        panic!("unexpected delete state")
    }
}

#[tokio::test]
async fn panicking_handler_returns_generic_500() {
    let app = app(AppState::new(Arc::new(PanickingRepository)));

    let response = app.oneshot(empty_request("GET", "/v2/todos")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Internal server error"})
    );
}

#[tokio::test]
async fn unknown_path_returns_json_404() {
    let (app, _) = test_app();

    let response = app.oneshot(empty_request("GET", "/v1/todos")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"message": "Not found"}));
}

#[tokio::test]
async fn unsupported_method_is_rejected_without_touching_store() {
    let (app, repo) = test_app();

    let response = app
        .oneshot(json_request("PATCH", "/v2/todos/abc", json!({"title": "A"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Method not allowed"})
    );
    assert!(repo.is_empty());
}

#[tokio::test]
async fn unsupported_method_on_collection_returns_json_405() {
    let (app, _) = test_app();

    let response = app
        .oneshot(empty_request("DELETE", "/v2/todos"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Method not allowed"})
    );
}
