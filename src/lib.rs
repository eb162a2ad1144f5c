//! Bookshelf service library
//!
//! The books module (model, query/update engine, HTTP handlers) and the
//! bootstrap that wires it to a record store and the HTTP facade.

pub mod app;
pub mod modules;

pub use modules::books::{Book, BookError, BookQuery, BookService, Rating};
