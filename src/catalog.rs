//! Book domain types and list transformations
//!
//! Raw catalog records arrive from the catalog service; the UI works with
//! [`Book`] values that carry the derived display fields (`is_favorite`,
//! `price_formatted`). The whole list is replaced, never merged: every
//! transformation here returns a fresh `Vec<Book>`.

use std::collections::HashSet;

use serde::Deserialize;

/// Raw catalog record as returned by the catalog service
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub name: String,
    pub price: Option<f64>,
    pub language: String,
    pub genre: String,
}

/// A catalog record augmented with derived UI fields
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: String,
    pub name: String,
    pub price: Option<f64>,
    pub language: String,
    pub genre: String,
    pub is_favorite: bool,
    pub price_formatted: String,
}

impl Book {
    /// Build a display book from a raw record with an explicit favorite flag
    pub fn from_record(record: BookRecord, is_favorite: bool) -> Self {
        let price_formatted = format_price(record.price);
        Self {
            id: record.id,
            name: record.name,
            price: record.price,
            language: record.language,
            genre: record.genre,
            is_favorite,
            price_formatted,
        }
    }
}

/// Map freshly loaded catalog records into display books.
///
/// Loader results always start unfavorited, even for ids already in the
/// favorite set. Search results go through [`from_search`] instead, which
/// resynchronizes the flag.
pub fn from_loaded(records: Vec<BookRecord>) -> Vec<Book> {
    records
        .into_iter()
        .map(|r| Book::from_record(r, false))
        .collect()
}

/// Map search results into display books, restoring each book's favorite
/// flag from the favorite set by id membership.
pub fn from_search(records: Vec<BookRecord>, favorites: &HashSet<String>) -> Vec<Book> {
    records
        .into_iter()
        .map(|r| {
            let is_favorite = favorites.contains(&r.id);
            Book::from_record(r, is_favorite)
        })
        .collect()
}

/// Return a new list with one book's favorite flag set.
///
/// Books other than `id` are carried over unchanged.
pub fn with_favorite(books: &[Book], id: &str, is_favorite: bool) -> Vec<Book> {
    books
        .iter()
        .map(|b| {
            if b.id == id {
                let mut b = b.clone();
                b.is_favorite = is_favorite;
                b
            } else {
                b.clone()
            }
        })
        .collect()
}

/// Render a price as a currency string with exactly two fractional digits.
///
/// Absent and zero prices render as the fixed string "$0.00".
pub fn format_price(amount: Option<f64>) -> String {
    match amount {
        None => "$0.00".to_string(),
        Some(v) if v == 0.0 => "$0.00".to_string(),
        Some(v) => format!("${:.2}", v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, price: Option<f64>) -> BookRecord {
        BookRecord {
            id: id.to_string(),
            name: name.to_string(),
            price,
            language: "English".to_string(),
            genre: "SciFi".to_string(),
        }
    }

    #[test]
    fn test_format_price_absent_and_zero() {
        assert_eq!(format_price(None), "$0.00");
        assert_eq!(format_price(Some(0.0)), "$0.00");
    }

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(Some(12.5)), "$12.50");
        assert_eq!(format_price(Some(15.0)), "$15.00");
    }

    #[test]
    fn test_format_price_rounds() {
        assert_eq!(format_price(Some(9.999)), "$10.00");
        assert_eq!(format_price(Some(1.005)), "$1.00"); // f64 1.005 is just below
        assert_eq!(format_price(Some(1.006)), "$1.01");
    }

    #[test]
    fn test_from_loaded_never_favorited() {
        let records = vec![record("1", "Dune", Some(15.0))];
        let books = from_loaded(records);
        assert_eq!(books.len(), 1);
        assert!(!books[0].is_favorite);
        assert_eq!(books[0].price_formatted, "$15.00");
    }

    #[test]
    fn test_from_search_restores_favorites() {
        let mut favorites = HashSet::new();
        favorites.insert("1".to_string());

        let records = vec![record("1", "Dune", Some(15.0)), record("2", "Hyperion", None)];
        let books = from_search(records, &favorites);

        assert!(books[0].is_favorite);
        assert!(!books[1].is_favorite);
        assert_eq!(books[1].price_formatted, "$0.00");
    }

    #[test]
    fn test_with_favorite_touches_only_target() {
        let books = from_loaded(vec![record("1", "Dune", None), record("2", "Hyperion", None)]);

        let updated = with_favorite(&books, "2", true);
        assert!(!updated[0].is_favorite);
        assert!(updated[1].is_favorite);

        // original list untouched
        assert!(!books[1].is_favorite);
    }

    #[test]
    fn test_with_favorite_unknown_id_is_identity() {
        let books = from_loaded(vec![record("1", "Dune", None)]);
        let updated = with_favorite(&books, "missing", true);
        assert_eq!(updated, books);
    }

    #[test]
    fn test_record_deserializes_with_missing_price() {
        let json = r#"{"id":"1","name":"Dune","language":"English","genre":"SciFi"}"#;
        let rec: BookRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.price, None);
    }
}
