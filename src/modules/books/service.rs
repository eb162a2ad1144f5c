//! Query and update engine for the catalog.

use std::sync::Arc;

use bookshelf_db::{Filter, RecordStore, StoreError};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Book, Rating};

#[derive(Error, Debug)]
pub enum BookError {
    #[error("'{0}' is not a valid book identifier")]
    InvalidIdentifier(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Optional search criteria; every present criterion must hold.
///
/// Text criteria are case-insensitive substring matches. Empty or blank text
/// is the same as no criterion. Year bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub year_from: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub year_to: Option<i32>,
}

impl BookQuery {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn year_from(mut self, year: i32) -> Self {
        self.year_from = Some(year);
        self
    }

    pub fn year_to(mut self, year: i32) -> Self {
        self.year_to = Some(year);
        self
    }

    /// Conjunction of the predicates this query asks for.
    pub fn to_filter(&self) -> Filter<Book> {
        let mut filter = Filter::new();

        if let Some(needle) = text_criterion(&self.title) {
            filter.push(move |book: &Book| contains_ignore_case(&book.title, &needle));
        }
        if let Some(needle) = text_criterion(&self.author) {
            filter.push(move |book: &Book| contains_ignore_case(&book.author, &needle));
        }
        if let Some(needle) = text_criterion(&self.genre) {
            filter.push(move |book: &Book| {
                book.genre
                    .as_deref()
                    .is_some_and(|genre| contains_ignore_case(genre, &needle))
            });
        }
        // A book without a year is outside every range.
        if let Some(from) = self.year_from {
            filter.push(move |book: &Book| book.publication_year.is_some_and(|year| year >= from));
        }
        if let Some(to) = self.year_to {
            filter.push(move |book: &Book| book.publication_year.is_some_and(|year| year <= to));
        }

        filter
    }
}

/// Lowercased needle, or `None` for absent and blank input.
fn text_criterion(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_lowercase)
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Catalog operations over a record store.
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn RecordStore<Book>>,
}

impl BookService {
    pub fn new(store: Arc<dyn RecordStore<Book>>) -> Self {
        Self { store }
    }

    /// Every book, in store order.
    pub async fn find_all(&self) -> Result<Vec<Book>, BookError> {
        let books = self.store.get_all().await?;
        tracing::debug!(count = books.len(), "listed books");
        Ok(books)
    }

    /// Books matching every criterion of `query`, in store order.
    ///
    /// An empty result is a normal outcome here.
    pub async fn search_books(&self, query: &BookQuery) -> Result<Vec<Book>, BookError> {
        let filter = query.to_filter();
        let books = self.store.scan(&filter).await?;
        tracing::debug!(
            criteria = filter.len(),
            matches = books.len(),
            "searched books"
        );
        Ok(books)
    }

    /// Set the rating of the book identified by `id`.
    ///
    /// Returns `Ok(None)` when the id is well formed but unknown. A malformed
    /// id fails before the store is touched.
    pub async fn update_rating(&self, id: &str, rating: Rating) -> Result<Option<Book>, BookError> {
        let uuid = Uuid::parse_str(id).map_err(|_| BookError::InvalidIdentifier(id.to_string()))?;

        let Some(mut book) = self.store.find_by_id(uuid).await? else {
            tracing::debug!(id = %uuid, "rating target not found");
            return Ok(None);
        };

        book.rating = Some(rating);
        let saved = self.store.save(book).await?;
        tracing::info!(id = %saved.id, rating = %rating, "book rated");

        Ok(Some(saved))
    }
}
