//! End-to-end scenarios against the full HTTP application.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookshelf::{app, Book};
use bookshelf_db::{MemoryStore, RecordStore};
use bookshelf_kernel::Settings;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn app_over(books: Vec<Book>) -> (Router, Arc<MemoryStore<Book>>) {
    let store = Arc::new(MemoryStore::with_records(books).unwrap());
    (app::router(store.clone(), &Settings::default()), store)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn rate(id: &str, rating: i64) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(format!("/api/books/rate/{}", id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "rating": rating }).to_string()))
        .unwrap()
}

fn titles(body: &[u8]) -> Vec<String> {
    let books: Vec<Value> = serde_json::from_slice(body).unwrap();
    books
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect()
}

fn harry_potter_books() -> Vec<Book> {
    vec![
        Book::new("Harry Potter", "J.K. Rowling")
            .genre("Fantasy")
            .published(1997),
        Book::new("Harry Potter and the Deathly Hallows", "J.K. Rowling")
            .genre("Fantasy")
            .published(2007),
    ]
}

#[tokio::test]
async fn list_returns_every_book_once() {
    let books = harry_potter_books();
    let (app, _) = app_over(books.clone());

    let (status, body) = call(&app, get("/api/books")).await;

    assert_eq!(status, StatusCode::OK);
    let listed: Vec<Book> = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed.len(), books.len());
    for book in &books {
        assert_eq!(listed.iter().filter(|b| b.id == book.id).count(), 1);
    }
}

#[tokio::test]
async fn list_on_empty_catalog_is_ok() {
    let (app, _) = app_over(vec![]);

    let (status, body) = call(&app, get("/api/books")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!([]));
}

#[tokio::test]
async fn search_by_title_returns_both_harry_potter_books() {
    let (app, _) = app_over(harry_potter_books());

    let (status, body) = call(&app, get("/api/books/search?title=Harry%20Potter")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        titles(&body),
        vec!["Harry Potter", "Harry Potter and the Deathly Hallows"]
    );
}

#[tokio::test]
async fn search_on_empty_catalog_is_not_found() {
    let (app, _) = app_over(vec![]);

    let (status, body) = call(&app, get("/api/books/search")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn search_without_parameters_matches_listing() {
    let (app, _) = app_over(harry_potter_books());

    let (_, listed) = call(&app, get("/api/books")).await;
    let (status, searched) = call(&app, get("/api/books/search")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&listed), titles(&searched));
}

#[tokio::test]
async fn search_text_is_case_insensitive() {
    let (app, _) = app_over(harry_potter_books());

    let (_, lower) = call(&app, get("/api/books/search?title=harry")).await;
    let (_, upper) = call(&app, get("/api/books/search?title=HARRY")).await;

    assert_eq!(titles(&lower), titles(&upper));
    assert_eq!(titles(&lower).len(), 2);
}

#[tokio::test]
async fn search_year_range_is_inclusive() {
    let (app, _) = app_over(harry_potter_books());

    let (status, body) = call(&app, get("/api/books/search?yearFrom=1997&yearTo=1997")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Harry Potter"]);

    let (status, body) = call(&app, get("/api/books/search?yearFrom=1998")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Harry Potter and the Deathly Hallows"]);
}

#[tokio::test]
async fn search_mid_century_range() {
    let (app, _) = app_over(vec![
        Book::new("The Great Gatsby", "F. Scott Fitzgerald")
            .genre("Novel")
            .published(1925),
        Book::new("To Kill a Mockingbird", "Harper Lee")
            .genre("Novel")
            .published(1960),
        Book::new("Catch-22", "Joseph Heller")
            .genre("Novel")
            .published(1961),
    ]);

    let (status, body) = call(&app, get("/api/books/search?yearFrom=1920&yearTo=1960")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        titles(&body),
        vec!["The Great Gatsby", "To Kill a Mockingbird"]
    );
}

#[tokio::test]
async fn rating_an_existing_book_persists() {
    let books = harry_potter_books();
    let id = books[0].id;
    let (app, store) = app_over(books);

    let (status, body) = call(&app, rate(&id.to_string(), 4)).await;

    assert_eq!(status, StatusCode::OK);
    let book: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(book["rating"], 4);
    assert_eq!(book["id"], id.to_string());

    let stored = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.rating.map(|r| r.get()), Some(4));
}

#[tokio::test]
async fn rating_out_of_range_is_rejected_without_writing() {
    let books = harry_potter_books();
    let id = books[0].id;
    let (app, store) = app_over(books);

    let (status, body) = call(&app, rate(&id.to_string(), 6)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
    assert_eq!(store.find_by_id(id).await.unwrap().unwrap().rating, None);
}

#[tokio::test]
async fn rating_an_unknown_book_is_not_found() {
    let (app, store) = app_over(harry_potter_books());

    let (status, body) = call(&app, rate(&Uuid::new_v4().to_string(), 4)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn rating_with_malformed_id_is_bad_request() {
    let (app, _) = app_over(harry_potter_books());

    let (status, body) = call(&app, rate("invalid-uuid", 4)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"]["code"], "invalid_identifier");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let (app, _) = app_over(vec![]);

    let response = app.oneshot(get("/api/books")).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn unknown_route_uses_error_body() {
    let (app, _) = app_over(vec![]);

    let (status, body) = call(&app, get("/api/authors")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"]["code"], "not_found");
}

#[tokio::test]
async fn openapi_document_lists_book_routes() {
    let (app, _) = app_over(vec![]);

    let (status, body) = call(&app, get("/docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    let spec: Value = serde_json::from_slice(&body).unwrap();
    assert!(spec["paths"]["/api/books"]["get"].is_object());
    assert!(spec["paths"]["/api/books/search"]["get"].is_object());
    assert!(spec["paths"]["/api/books/rate/{id}"]["post"].is_object());
}
