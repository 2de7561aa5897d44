use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use super::routes;
use crate::app::App;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::sqlite::{self, SqliteRepositories};

struct TestServer {
    router: Router,
    // Keeps the database file alive for the test's duration.
    _dir: TempDir,
}

struct TestResponse {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("castdb.db");
        let pool = sqlite::connect(path.to_str().unwrap()).await.unwrap();
        sqlite::ensure_schema(&pool).await.unwrap();

        let app = Arc::new(App::new(
            SqliteRepositories::new(pool),
            Arc::new(SystemClock::new()),
        ));
        Self {
            router: routes().with_state(app),
            _dir: dir,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            location,
            body,
        }
    }

    async fn create_actor(&self, name: &str) -> String {
        let resp = self
            .send(Method::POST, "/actors", Some(json!({ "name": name })))
            .await;
        assert_eq!(resp.status, StatusCode::CREATED);
        resp.body["id"].as_str().unwrap().to_string()
    }

    async fn create_invoice(&self) -> String {
        let resp = self
            .send(Method::POST, "/invoices", Some(invoice_body(None, &["Repulsor"])))
            .await;
        assert_eq!(resp.status, StatusCode::CREATED);
        resp.body["id"].as_str().unwrap().to_string()
    }

    async fn create_movie(&self, title: &str, year: i32) -> String {
        let resp = self
            .send(
                Method::POST,
                "/movies",
                Some(json!({ "title": title, "releaseYear": year })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED);
        resp.body["id"].as_str().unwrap().to_string()
    }
}

fn invoice_body(id: Option<&str>, item_names: &[&str]) -> Value {
    let items: Vec<Value> = item_names
        .iter()
        .map(|name| json!({ "name": name, "unitPrice": 100.0, "quantity": 2 }))
        .collect();
    let mut body = json!({
        "invoiceNumber": "INV-002",
        "contactName": "Pepper Potts",
        "amount": 250.0,
        "invoiceDate": "2024-02-01T00:00:00+00:00",
        "dueDate": "2024-02-15T00:00:00+00:00",
        "status": "AwaitPayment",
        "invoiceItems": items
    });
    if let Some(id) = id {
        body["id"] = json!(id);
    }
    body
}

#[tokio::test]
async fn health_responds_ok() {
    let server = TestServer::start().await;

    let resp = server.send(Method::GET, "/health", None).await;

    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn casting_round_trip() {
    let server = TestServer::start().await;
    let actor_id = server.create_actor("Iron Man").await;
    let movie_id = server.create_movie("Avengers", 2012).await;
    let link = format!("/actors/{actor_id}/movies/{movie_id}");

    let added = server.send(Method::POST, &link, None).await;
    assert_eq!(added.status, StatusCode::CREATED);
    assert_eq!(added.location, Some(format!("/actors/{actor_id}")));
    assert_eq!(added.body["name"], "Iron Man");
    assert_eq!(added.body["movies"][0]["id"], movie_id.as_str());
    assert_eq!(added.body["movies"][0]["title"], "Avengers");

    let again = server.send(Method::POST, &link, None).await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let removed = server.send(Method::DELETE, &link, None).await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let removed_again = server.send(Method::DELETE, &link, None).await;
    assert_eq!(removed_again.status, StatusCode::NO_CONTENT);

    let movies = server
        .send(Method::GET, &format!("/actors/{actor_id}/movies"), None)
        .await;
    assert_eq!(movies.status, StatusCode::OK);
    assert_eq!(movies.body, json!([]));
}

#[tokio::test]
async fn create_returns_location_of_new_actor() {
    let server = TestServer::start().await;

    let resp = server
        .send(Method::POST, "/actors", Some(json!({ "name": "Black Widow" })))
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let location = resp.location.unwrap();
    assert_eq!(location, format!("/actors/{}", resp.body["id"].as_str().unwrap()));
    assert_eq!(resp.body["movies"], json!([]));

    let fetched = server.send(Method::GET, &location, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Black Widow");
}

#[tokio::test]
async fn duplicate_actor_name_is_conflict() {
    let server = TestServer::start().await;
    server.create_actor("Hawkeye").await;

    let resp = server
        .send(Method::POST, "/actors", Some(json!({ "name": "Hawkeye" })))
        .await;

    assert_eq!(resp.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_actor_name_is_unprocessable() {
    let server = TestServer::start().await;

    let resp = server
        .send(Method::POST, "/actors", Some(json!({ "name": "   " })))
        .await;

    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_with_mismatched_id_is_bad_request() {
    let server = TestServer::start().await;
    let actor_id = server.create_actor("Thor").await;
    let other_id = uuid::Uuid::new_v4();

    let resp = server
        .send(
            Method::PUT,
            &format!("/actors/{actor_id}"),
            Some(json!({ "id": other_id, "name": "Loki" })),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    let fetched = server.send(Method::GET, &format!("/actors/{actor_id}"), None).await;
    assert_eq!(fetched.body["name"], "Thor");
}

#[tokio::test]
async fn update_replaces_actor() {
    let server = TestServer::start().await;
    let actor_id = server.create_actor("Thor").await;

    let resp = server
        .send(
            Method::PUT,
            &format!("/actors/{actor_id}"),
            Some(json!({ "id": actor_id, "name": "Thor Odinson" })),
        )
        .await;

    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let fetched = server.send(Method::GET, &format!("/actors/{actor_id}"), None).await;
    assert_eq!(fetched.body["name"], "Thor Odinson");
    assert_eq!(fetched.body["version"], 2);
}

#[tokio::test]
async fn update_of_missing_actor_is_not_found() {
    let server = TestServer::start().await;
    let missing = uuid::Uuid::new_v4();

    let resp = server
        .send(
            Method::PUT,
            &format!("/actors/{missing}"),
            Some(json!({ "id": missing, "name": "Nobody" })),
        )
        .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stale_version_on_existing_actor_is_internal_error() {
    let server = TestServer::start().await;
    let actor_id = server.create_actor("Vision").await;

    let resp = server
        .send(
            Method::PUT,
            &format!("/actors/{actor_id}"),
            Some(json!({ "id": actor_id, "name": "Vision 2", "version": 7 })),
        )
        .await;

    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body, Value::String("Internal error".to_string()));
}

#[tokio::test]
async fn deleted_actor_and_its_movies_are_gone() {
    let server = TestServer::start().await;
    let actor_id = server.create_actor("Gamora").await;
    let movie_id = server.create_movie("Guardians of the Galaxy", 2014).await;
    server
        .send(Method::POST, &format!("/actors/{actor_id}/movies/{movie_id}"), None)
        .await;

    let deleted = server.send(Method::DELETE, &format!("/actors/{actor_id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let movies = server
        .send(Method::GET, &format!("/actors/{actor_id}/movies"), None)
        .await;
    assert_eq!(movies.status, StatusCode::NOT_FOUND);

    let cast = server
        .send(Method::GET, &format!("/movies/{movie_id}/actors"), None)
        .await;
    assert_eq!(cast.status, StatusCode::OK);
    assert_eq!(cast.body, json!([]));

    let again = server.send(Method::DELETE, &format!("/actors/{actor_id}"), None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn linking_missing_movie_is_not_found() {
    let server = TestServer::start().await;
    let actor_id = server.create_actor("Nebula").await;
    let missing = uuid::Uuid::new_v4();

    let resp = server
        .send(Method::POST, &format!("/actors/{actor_id}/movies/{missing}"), None)
        .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(resp.body.as_str().unwrap().contains("Movie"));
}

#[tokio::test]
async fn expand_false_omits_related_set() {
    let server = TestServer::start().await;
    let actor_id = server.create_actor("Groot").await;
    let movie_id = server.create_movie("Guardians of the Galaxy", 2014).await;
    server
        .send(Method::POST, &format!("/actors/{actor_id}/movies/{movie_id}"), None)
        .await;

    let expanded = server.send(Method::GET, "/actors", None).await;
    assert_eq!(expanded.body[0]["movies"][0]["id"], movie_id.as_str());

    let bare = server.send(Method::GET, "/actors?expand=false", None).await;
    assert_eq!(bare.status, StatusCode::OK);
    assert!(bare.body[0].get("movies").is_none());

    let movie = server
        .send(Method::GET, &format!("/movies/{movie_id}"), None)
        .await;
    assert_eq!(movie.body["actors"][0]["name"], "Groot");
}

#[tokio::test]
async fn invoice_crud() {
    let server = TestServer::start().await;

    let created = server
        .send(
            Method::POST,
            "/invoices",
            Some(json!({
                "invoiceNumber": "INV-002",
                "contactName": "Pepper Potts",
                "description": "Suit repairs",
                "amount": 250.0,
                "invoiceDate": "2024-02-01T00:00:00+00:00",
                "dueDate": "2024-02-15T00:00:00+00:00",
                "status": "AwaitPayment",
                "invoiceItems": [
                    { "name": "Repulsor", "unitPrice": 100.0, "quantity": 2 },
                    { "name": "Paint", "description": "Hot rod red", "unitPrice": 50.0, "quantity": 1 }
                ]
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_str().unwrap().to_string();
    assert_eq!(created.location, Some(format!("/invoices/{id}")));

    let fetched = server.send(Method::GET, &format!("/invoices/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    let items = fetched.body["invoiceItems"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Repulsor");
    assert_eq!(items[1]["name"], "Paint");

    let deleted = server.send(Method::DELETE, &format!("/invoices/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let gone = server.send(Method::GET, &format!("/invoices/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn movie_update_and_delete() {
    let server = TestServer::start().await;
    let actor_id = server.create_actor("Iron Man").await;
    let movie_id = server.create_movie("Avengers", 2012).await;
    server
        .send(Method::POST, &format!("/actors/{actor_id}/movies/{movie_id}"), None)
        .await;
    let movie_uri = format!("/movies/{movie_id}");

    let updated = server
        .send(
            Method::PUT,
            &movie_uri,
            Some(json!({ "id": movie_id, "title": "The Avengers", "releaseYear": 2012 })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::NO_CONTENT);
    let fetched = server.send(Method::GET, &movie_uri, None).await;
    assert_eq!(fetched.body["title"], "The Avengers");
    assert_eq!(fetched.body["version"], 2);
    assert_eq!(fetched.body["actors"][0]["name"], "Iron Man");

    let mismatched = server
        .send(
            Method::PUT,
            &movie_uri,
            Some(json!({ "id": uuid::Uuid::new_v4(), "title": "Age of Ultron", "releaseYear": 2015 })),
        )
        .await;
    assert_eq!(mismatched.status, StatusCode::BAD_REQUEST);

    let deleted = server.send(Method::DELETE, &movie_uri, None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let movies = server
        .send(Method::GET, &format!("/actors/{actor_id}/movies"), None)
        .await;
    assert_eq!(movies.status, StatusCode::OK);
    assert_eq!(movies.body, json!([]));

    let gone = server.send(Method::GET, &movie_uri, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    let again = server.send(Method::DELETE, &movie_uri, None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invoice_update_replaces_items() {
    let server = TestServer::start().await;
    let id = server.create_invoice().await;
    let uri = format!("/invoices/{id}");

    let resp = server
        .send(Method::PUT, &uri, Some(invoice_body(Some(&id), &["Arc reactor", "Gauntlet"])))
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let fetched = server.send(Method::GET, &uri, None).await;
    assert_eq!(fetched.body["version"], 2);
    let items = fetched.body["invoiceItems"].as_array().unwrap();
    let names: Vec<&str> = items.iter().map(|i| i["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Arc reactor", "Gauntlet"]);
}

#[tokio::test]
async fn invoice_update_with_mismatched_id_leaves_invoice_untouched() {
    let server = TestServer::start().await;
    let id = server.create_invoice().await;
    let uri = format!("/invoices/{id}");
    let before = server.send(Method::GET, &uri, None).await;

    let other = uuid::Uuid::new_v4().to_string();
    let resp = server
        .send(Method::PUT, &uri, Some(invoice_body(Some(&other), &["Gauntlet"])))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let after = server.send(Method::GET, &uri, None).await;
    assert_eq!(after.body, before.body);
    assert_eq!(after.body["version"], 1);
}
