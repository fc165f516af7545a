//! Categories and the fixed-order records persisted for each of them.

use chrono::{Local, NaiveDateTime, Timelike};
use std::fmt;

/// Format of every capture and log timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fallback for book fields the upstream leaves out.
pub const UNKNOWN: &str = "Unknown";
/// Fallback for a missing book description.
pub const NO_DESCRIPTION: &str = "No description available.";
/// Fallback for a quote body.
pub const NO_QUOTE: &str = "No quote available.";
/// Fallback for a quote author.
pub const ANONYMOUS: &str = "Anonymous";
/// Fallback for a quote category.
pub const GENERAL: &str = "General";
/// Breed label used when the image URL carries no usable breed.
pub const RANDOM_DOG: &str = "Random Dog";

/// Current local time truncated to whole seconds.
pub fn timestamp_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// One of the four content kinds, each with its own endpoint and store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Advice,
    Book,
    Quote,
    Dog,
}

impl Category {
    /// Every category, in the order the "everything" run visits them.
    pub const ALL: [Category; 4] = [
        Category::Advice,
        Category::Book,
        Category::Quote,
        Category::Dog,
    ];

    /// Label used in log lines and store file names.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Advice => "advice",
            Category::Book => "books",
            Category::Quote => "quotes",
            Category::Dog => "dogs",
        }
    }

    /// The header row every store of this category starts with.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Category::Advice => &["Id", "Advice", "Timestamp"],
            Category::Book => &[
                "Title",
                "Author",
                "Pages",
                "Release Date",
                "Description",
                "Timestamp",
            ],
            Category::Quote => &["Quote", "Author", "Category", "Timestamp"],
            Category::Dog => &["Image URL", "Breed Info", "Timestamp"],
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}_data.csv", self.label())
    }

    /// Noun used in user-facing messages ("Failed to fetch a book").
    pub fn noun(&self) -> &'static str {
        match self {
            Category::Advice => "advice",
            Category::Book => "book recommendation",
            Category::Quote => "quote",
            Category::Dog => "dog image",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceRecord {
    pub id: u64,
    pub text: String,
    pub captured_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    /// Kept as text: the upstream may omit it, in which case it is [`UNKNOWN`].
    pub pages: String,
    pub release_date: String,
    pub description: String,
    pub captured_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRecord {
    pub text: String,
    pub author: String,
    pub category: String,
    pub captured_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogRecord {
    pub image_url: String,
    pub breed: String,
    pub captured_at: NaiveDateTime,
}

/// A normalized item, ready to be shown and appended to its store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Advice(AdviceRecord),
    Book(BookRecord),
    Quote(QuoteRecord),
    Dog(DogRecord),
}

impl Record {
    pub fn category(&self) -> Category {
        match self {
            Record::Advice(_) => Category::Advice,
            Record::Book(_) => Category::Book,
            Record::Quote(_) => Category::Quote,
            Record::Dog(_) => Category::Dog,
        }
    }

    pub fn captured_at(&self) -> &NaiveDateTime {
        match self {
            Record::Advice(r) => &r.captured_at,
            Record::Book(r) => &r.captured_at,
            Record::Quote(r) => &r.captured_at,
            Record::Dog(r) => &r.captured_at,
        }
    }

    /// The row to persist, in the order of [`Category::header`].
    pub fn to_row(&self) -> Vec<String> {
        let stamp = format_timestamp(self.captured_at());
        match self {
            Record::Advice(r) => vec![r.id.to_string(), r.text.clone(), stamp],
            Record::Book(r) => vec![
                r.title.clone(),
                r.author.clone(),
                r.pages.clone(),
                r.release_date.clone(),
                r.description.clone(),
                stamp,
            ],
            Record::Quote(r) => vec![r.text.clone(), r.author.clone(), r.category.clone(), stamp],
            Record::Dog(r) => vec![r.image_url.clone(), r.breed.clone(), stamp],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 5, 7)
            .unwrap()
    }

    fn sample_records() -> Vec<Record> {
        vec![
            Record::Advice(AdviceRecord {
                id: 42,
                text: "Drink water.".to_string(),
                captured_at: fixed_time(),
            }),
            Record::Book(BookRecord {
                title: "Philosopher's Stone".to_string(),
                author: "J. K. Rowling".to_string(),
                pages: UNKNOWN.to_string(),
                release_date: "Jun 26, 1997".to_string(),
                description: NO_DESCRIPTION.to_string(),
                captured_at: fixed_time(),
            }),
            Record::Quote(QuoteRecord {
                text: "Keep going.".to_string(),
                author: ANONYMOUS.to_string(),
                category: GENERAL.to_string(),
                captured_at: fixed_time(),
            }),
            Record::Dog(DogRecord {
                image_url: "https://images.dog.ceo/breeds/pug/a.jpg".to_string(),
                breed: "Pug".to_string(),
                captured_at: fixed_time(),
            }),
        ]
    }

    #[test]
    fn test_rows_match_header_width() {
        for record in sample_records() {
            assert_eq!(
                record.to_row().len(),
                record.category().header().len(),
                "row width for {}",
                record.category()
            );
        }
    }

    #[test]
    fn test_timestamp_is_last_column() {
        for record in sample_records() {
            let row = record.to_row();
            assert_eq!(row.last().unwrap(), "2024-03-09 08:05:07");
            assert_eq!(*record.category().header().last().unwrap(), "Timestamp");
        }
    }

    #[test]
    fn test_book_row_order() {
        let row = sample_records()[1].to_row();
        assert_eq!(row[0], "Philosopher's Stone");
        assert_eq!(row[2], UNKNOWN);
        assert_eq!(row[3], "Jun 26, 1997");
        assert_eq!(row[4], NO_DESCRIPTION);
    }

    #[test]
    fn test_category_order_and_labels() {
        let labels: Vec<_> = Category::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["advice", "books", "quotes", "dogs"]);
        assert_eq!(Category::Quote.file_name(), "quotes_data.csv");
    }

    #[test]
    fn test_timestamp_now_has_whole_seconds() {
        assert_eq!(timestamp_now().nanosecond(), 0);
    }
}
