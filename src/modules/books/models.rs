use std::fmt;

use bookshelf_db::Record;
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier for the book, fixed at creation
    pub id: Uuid,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Genre, when known
    #[serde(default)]
    pub genre: Option<String>,
    /// Year of first publication, when known
    #[serde(default)]
    pub publication_year: Option<i32>,
    /// Reader score; `None` until the book is rated
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: Option<Rating>,
}

impl Book {
    /// New unrated book with a fresh identifier.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: author.into(),
            genre: None,
            publication_year: None,
            rating: None,
        }
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn published(mut self, year: i32) -> Self {
        self.publication_year = Some(year);
        self
    }
}

impl Record for Book {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Score between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating {0} is outside {min}..={max}", min = Rating::MIN, max = Rating::MAX)]
pub struct RatingOutOfRange(pub i64);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, RatingOutOfRange> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RatingOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Rating::new(value).map_err(de::Error::custom)
    }
}

// Stored catalogs mark unrated books with 0; it never becomes a rating.
fn deserialize_rating<'de, D>(deserializer: D) -> Result<Option<Rating>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<i64>::deserialize(deserializer)? {
        None | Some(0) => Ok(None),
        Some(value) => Rating::new(value).map(Some).map_err(de::Error::custom),
    }
}

/// Body of `POST /api/books/rate/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRequest {
    #[serde(deserialize_with = "deserialize_requested_rating")]
    pub rating: i64,
}

// Integers wider than i64 saturate; they are out of range either way.
fn deserialize_requested_rating<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    if number.is_u64() {
        return Ok(i64::MAX);
    }
    match number.as_f64() {
        Some(value) if value >= I64_BOUND => Ok(i64::MAX),
        Some(value) if value <= -I64_BOUND => Ok(i64::MIN),
        _ => Err(de::Error::custom(format!("rating {} is not an integer", number))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rating_accepts_one_through_five() {
        for value in 1..=5 {
            assert_eq!(Rating::new(value).unwrap().get() as i64, value);
        }
        assert_eq!(Rating::new(0), Err(RatingOutOfRange(0)));
        assert_eq!(Rating::new(6), Err(RatingOutOfRange(6)));
        assert_eq!(Rating::try_from(-3), Err(RatingOutOfRange(-3)));
    }

    #[test]
    fn rating_error_message() {
        assert_eq!(
            RatingOutOfRange(9).to_string(),
            "rating 9 is outside 1..=5"
        );
    }

    #[test]
    fn requested_rating_saturates_wide_integers() {
        let parse = |body: &str| serde_json::from_str::<RatingRequest>(body).map(|r| r.rating);

        assert_eq!(parse(r#"{"rating": 4}"#).unwrap(), 4);
        assert_eq!(parse(r#"{"rating": 9223372036854775808}"#).unwrap(), i64::MAX);
        assert_eq!(parse(r#"{"rating": 18446744073709551616}"#).unwrap(), i64::MAX);
        assert_eq!(parse(r#"{"rating": -9223372036854775809}"#).unwrap(), i64::MIN);
        assert!(parse(r#"{"rating": 2.5}"#).is_err());
        assert!(parse(r#"{"rating": "four"}"#).is_err());
    }

    #[test]
    fn book_serializes_in_camel_case() {
        let mut book = Book::new("Dune", "Frank Herbert")
            .genre("Science Fiction")
            .published(1965);
        book.rating = Some(Rating::new(5).unwrap());

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["id"], json!(book.id.to_string()));
        assert_eq!(value["publicationYear"], json!(1965));
        assert_eq!(value["genre"], json!("Science Fiction"));
        assert_eq!(value["rating"], json!(5));
    }

    #[test]
    fn unrated_book_serializes_null_rating() {
        let value = serde_json::to_value(Book::new("Emma", "Jane Austen")).unwrap();
        assert_eq!(value["rating"], json!(null));
        assert_eq!(value["genre"], json!(null));
    }

    #[test]
    fn stored_zero_rating_reads_as_unrated() {
        let book: Book = serde_json::from_value(json!({
            "id": "0b8e5c4e-7d43-4c39-9a57-3f2f1b0c6d11",
            "title": "The Great Gatsby",
            "author": "F. Scott Fitzgerald",
            "genre": "Novel",
            "publicationYear": 1925,
            "rating": 0
        }))
        .unwrap();

        assert_eq!(book.rating, None);
        assert_eq!(book.publication_year, Some(1925));
    }

    #[test]
    fn missing_optional_fields_default_to_none() {
        let book: Book = serde_json::from_value(json!({
            "id": "0b8e5c4e-7d43-4c39-9a57-3f2f1b0c6d11",
            "title": "Beowulf",
            "author": "Unknown"
        }))
        .unwrap();

        assert_eq!(book.genre, None);
        assert_eq!(book.publication_year, None);
        assert_eq!(book.rating, None);
    }

    #[test]
    fn stored_out_of_range_rating_is_rejected() {
        let result = serde_json::from_value::<Book>(json!({
            "id": "0b8e5c4e-7d43-4c39-9a57-3f2f1b0c6d11",
            "title": "Beowulf",
            "author": "Unknown",
            "rating": 11
        }));
        assert!(result.is_err());
    }
}
