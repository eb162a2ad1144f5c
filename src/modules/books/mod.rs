pub mod models;
pub mod routes;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_db::RecordStore;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

pub use models::{Book, Rating, RatingOutOfRange, RatingRequest};
pub use service::{BookError, BookQuery, BookService};

/// Catalog module: listing, search and ratings under `/api/books`
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(service: BookService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.service.find_all().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = books.len(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn openapi_fragment() -> serde_json::Value {
    let book_list = json!({
        "application/json": {
            "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
        }
    });
    let error_body = json!({
        "application/json": {
            "schema": { "$ref": "#/components/schemas/ErrorResponse" }
        }
    });
    let text_param = |name: &str, description: &str| {
        json!({
            "name": name,
            "in": "query",
            "required": false,
            "description": description,
            "schema": { "type": "string" }
        })
    };
    let year_param = |name: &str, description: &str| {
        json!({
            "name": name,
            "in": "query",
            "required": false,
            "description": description,
            "schema": { "type": "integer" }
        })
    };

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": { "description": "Every book in the catalog", "content": book_list },
                        "500": { "description": "Internal server error", "content": error_body }
                    }
                }
            },
            "/search": {
                "get": {
                    "summary": "Search books",
                    "tags": ["Books"],
                    "parameters": [
                        text_param("title", "Case-insensitive substring of the title"),
                        text_param("author", "Case-insensitive substring of the author"),
                        text_param("genre", "Case-insensitive substring of the genre"),
                        year_param("yearFrom", "Earliest publication year, inclusive"),
                        year_param("yearTo", "Latest publication year, inclusive")
                    ],
                    "responses": {
                        "200": { "description": "Matching books", "content": book_list },
                        "400": {
                            "description": "Malformed query parameter",
                            "content": error_body
                        },
                        "404": { "description": "No book matches" },
                        "500": { "description": "Internal server error", "content": error_body }
                    }
                }
            },
            "/rate/{id}": {
                "post": {
                    "summary": "Rate a book",
                    "tags": ["Books"],
                    "parameters": [{
                        "name": "id",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "string", "format": "uuid" }
                    }],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/RatingRequest" }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "The rated book",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Book" }
                                }
                            }
                        },
                        "400": {
                            "description": "Rating outside 1..5, or malformed id",
                            "content": error_body
                        },
                        "404": { "description": "No book with this id" },
                        "422": { "description": "Rating is not an integer", "content": error_body }
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "format": "uuid" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": "string", "nullable": true },
                        "publicationYear": { "type": "integer", "nullable": true },
                        "rating": {
                            "type": "integer",
                            "minimum": 1,
                            "maximum": 5,
                            "nullable": true,
                            "description": "null until the book is rated"
                        }
                    },
                    "required": ["id", "title", "author"]
                },
                "RatingRequest": {
                    "type": "object",
                    "properties": {
                        "rating": { "type": "integer", "minimum": 1, "maximum": 5 }
                    },
                    "required": ["rating"]
                }
            }
        }
    })
}

/// Create the books module over the given record store
pub fn create_module(store: Arc<dyn RecordStore<Book>>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(BookService::new(store)))
}
