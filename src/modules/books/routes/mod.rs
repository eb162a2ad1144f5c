//! HTTP handlers for `/api/books`.
//!
//! Status mapping:
//! - listing always answers 200 with a (possibly empty) array;
//! - search answers 404 with no body when nothing matches;
//! - rating answers 400 with no body for values outside 1..=5 (the engine is
//!   not called), 404 with no body for unknown ids, and 400 with an error
//!   body for malformed ids.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bookshelf_http::AppError;
use serde_json::json;

use super::models::{Book, Rating, RatingRequest};
use super::service::{BookError, BookQuery, BookService};

/// Routes of the books module, relative to its mount point.
pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", get(list_books))
        .route("/search", get(search_books))
        .route("/rate/{id}", post(rate_book))
        .route("/health", get(health_check))
        .with_state(service)
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        let message = err.to_string();
        match err {
            BookError::InvalidIdentifier(id) => {
                AppError::bad_request(message)
                    .with_code("invalid_identifier")
                    .with_details(vec![json!({ "field": "id", "value": id })])
            }
            BookError::Store(store_err) => {
                AppError::Internal(anyhow::Error::new(store_err).context("record store failure"))
            }
        }
    }
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(State(service): State<BookService>) -> Result<Json<Vec<Book>>, AppError> {
    let books = service.find_all().await?;
    Ok(Json(books))
}

async fn search_books(
    State(service): State<BookService>,
    query: Result<Query<BookQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let books = service.search_books(&query).await?;
    if books.is_empty() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    Ok(Json(books).into_response())
}

async fn rate_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
    body: Result<Json<RatingRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = body.map_err(rating_body_rejected)?;

    let rating = match Rating::new(request.rating) {
        Ok(rating) => rating,
        Err(err) => {
            tracing::debug!(%id, error = %err, "rating rejected");
            return Ok(StatusCode::BAD_REQUEST.into_response());
        }
    };

    match service.update_rating(&id, rating).await? {
        Some(book) => Ok(Json(book).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

fn rating_body_rejected(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(err) => AppError::validation(
            vec![json!({ "field": "rating", "error": err.body_text() })],
            "rating must be an integer",
        ),
        other => AppError::bad_request(other.body_text()),
    }
}
