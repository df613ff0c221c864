use std::fs;
use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use niche_records::{build_router, AppState, EmptyResultPolicy, ServerConfig};

const FOOD: &str = "Name,Price\nPasta,10\nPizza,12\n";
const RESTRO: &str = "Name,Cuisine,City\nGolden Spoon,Italian,Pune\nBlue Dragon,Chinese,Delhi\nLittle Oven,Italian,Mumbai\n";

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn fixture_dir() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "food.csv", FOOD);
    write(tmp.path(), "restro.csv", RESTRO);
    tmp
}

fn app_with(dir: &TempDir, empty_results: EmptyResultPolicy) -> Router {
    let config = ServerConfig {
        data_dir: dir.path().to_path_buf(),
        default_dataset: "restro".to_string(),
        empty_results,
        ..ServerConfig::default()
    };
    build_router(AppState::new(config))
}

fn app(dir: &TempDir) -> Router {
    app_with(dir, EmptyResultPolicy::EmptyArray)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn root_returns_welcome_message() {
    let dir = fixture_dir();
    let (status, body) = get(app(&dir), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("/records"));
}

#[tokio::test]
async fn niche_range_returns_rows_up_to_end_id() {
    let dir = fixture_dir();
    let (status, body) = get(app(&dir), "/records/food/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 1, "name": "Pasta", "price": 10}]));
}

#[tokio::test]
async fn niche_range_past_max_returns_everything() {
    let dir = fixture_dir();
    let (status, body) = get(app(&dir), "/records/food/500").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn niche_range_zero_or_negative_is_not_found() {
    let dir = fixture_dir();
    let (status, _) = get(app(&dir), "/records/food/0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(app(&dir), "/records/food/-4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn niche_name_is_trimmed_and_case_insensitive() {
    let dir = fixture_dir();
    let (status, body) = get(app(&dir), "/records/FOOD/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_niche_is_not_found() {
    let dir = fixture_dir();
    let (status, body) = get(app(&dir), "/records/unknownniche").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("unknownniche"));

    let (status, _) = get(app(&dir), "/records/unknownniche/3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn niche_limit_is_range_and_bounded() {
    let dir = fixture_dir();
    let (status, body) = get(app(&dir), "/records/food?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 1, "name": "Pasta", "price": 10}]));

    let (status, body) = get(app(&dir), "/records/food").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = get(app(&dir), "/records/food?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(app(&dir), "/records/food?limit=1001").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn records_lists_default_dataset_with_limit() {
    let dir = fixture_dir();
    let (status, body) = get(app(&dir), "/records").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = get(app(&dir), "/records?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Golden Spoon", "Blue Dragon"]);
}

#[tokio::test]
async fn record_by_id_from_default_dataset() {
    let dir = fixture_dir();
    let (status, body) = get(app(&dir), "/records/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 2, "name": "Blue Dragon", "cuisine": "Chinese", "city": "Delhi"})
    );

    let (status, body) = get(app(&dir), "/records/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Record not found");
}

#[tokio::test]
async fn missing_default_dataset_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "food.csv", FOOD);
    let (status, _) = get(app(&tmp), "/records/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unparsable_or_empty_dataset_is_unavailable() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "restro.csv", "a,b\n1,2\n3,4,5\n");
    write(tmp.path(), "blank.csv", "a,b\n");

    let (status, body) = get(app(&tmp), "/records").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Dataset not loaded"));

    let (status, _) = get(app(&tmp), "/records/blank").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn keyword_search_is_case_insensitive() {
    let dir = fixture_dir();
    let (status, body) = get(app(&dir), "/get_data?keyword=ITALIAN").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);

    let (_, body) = get(app(&dir), "/datasets/food/search?keyword=pizza").await;
    assert_eq!(body, json!([{"id": 2, "name": "Pizza", "price": 12}]));
}

#[tokio::test]
async fn empty_keyword_matches_everything() {
    let dir = fixture_dir();
    let (_, body) = get(app(&dir), "/get_data").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    let (_, body) = get(app(&dir), "/get_data?keyword=").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn empty_search_result_follows_policy() {
    let dir = fixture_dir();
    let (status, body) = get(app(&dir), "/get_data?keyword=sushi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let strict = app_with(&dir, EmptyResultPolicy::NotFound);
    let (status, _) = get(strict, "/get_data?keyword=sushi").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cached_dataset_survives_file_removal() {
    let dir = fixture_dir();
    let app = app(&dir);
    let (status, _) = get(app.clone(), "/records/food/2").await;
    assert_eq!(status, StatusCode::OK);

    fs::remove_file(dir.path().join("food.csv")).unwrap();
    let (status, body) = get(app.clone(), "/records/food/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, health) = get(app, "/health").await;
    assert_eq!(health["cached_datasets"], 1);
}

#[tokio::test]
async fn evicted_dataset_is_read_again() {
    let dir = fixture_dir();
    for i in 0..10 {
        write(dir.path(), &format!("n{i}.csv"), "v\nx\n");
    }
    let app = app(&dir);

    get(app.clone(), "/records/food").await;
    for i in 0..10 {
        let (status, _) = get(app.clone(), &format!("/records/n{i}")).await;
        assert_eq!(status, StatusCode::OK);
    }

    // food was least recently used and is gone from the cache, so a changed
    // file on disk is now visible.
    write(dir.path(), "food.csv", "Name,Price\nSoup,4\n");
    let (_, body) = get(app, "/records/food").await;
    assert_eq!(body, json!([{"id": 1, "name": "Soup", "price": 4}]));
}

#[tokio::test]
async fn keyword_matches_cell_text_as_written() {
    let dir = fixture_dir();
    write(dir.path(), "menu.csv", "Name,Price,Code\nPasta,10.0,007\nPizza,4.50,1e3\n");
    let app = app(&dir);

    let (_, body) = get(app.clone(), "/datasets/menu/search?keyword=10.0").await;
    assert_eq!(body, json!([{"id": 1, "name": "Pasta", "price": 10.0, "code": 7}]));

    let (_, body) = get(app, "/datasets/menu/search?keyword=4.50").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Pizza");
}

#[tokio::test]
async fn colliding_headers_are_suffixed() {
    let dir = fixture_dir();
    write(dir.path(), "dup.csv", "Name,name\nA,B\n");
    let (status, body) = get(app(&dir), "/records/dup/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 1, "name": "A", "name.1": "B"}]));
}

#[tokio::test]
async fn preload_warms_cache_with_default_dataset() {
    let dir = fixture_dir();
    let state = AppState::new(ServerConfig {
        data_dir: dir.path().to_path_buf(),
        ..ServerConfig::default()
    });
    assert_eq!(state.preload().await.unwrap(), 3);
    assert!(state.registry.cache().contains("restro"));
}

#[tokio::test]
async fn preload_failure_leaves_server_usable() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "food.csv", FOOD);
    let state = AppState::new(ServerConfig {
        data_dir: tmp.path().to_path_buf(),
        ..ServerConfig::default()
    });
    let err = state.preload().await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert!(state.registry.cache().is_empty());

    let (status, _) = get(build_router(state), "/records/food/1").await;
    assert_eq!(status, StatusCode::OK);
}
