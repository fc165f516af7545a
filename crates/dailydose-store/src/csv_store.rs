//! Append-only CSV stores, one file per category.
//!
//! Each store starts with the category's fixed header row and only ever grows
//! by whole rows. A row is serialized in memory first and written with a
//! single `write_all`, so a store never holds half a record.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use dailydose_core::error::AppError;
use dailydose_core::models::{Category, Record};
use dailydose_core::{StorageConfig, StoreStats};
use tracing::{debug, info, warn};

/// Persistence for fetched records.
///
/// # Examples
///
/// ```no_run
/// use dailydose_core::{Category, StorageConfig};
/// use dailydose_store::CsvStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = CsvStore::new(StorageConfig::default());
/// store.ensure_all()?;
/// println!("{} advice rows", store.count_rows(Category::Advice));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvStore {
    storage: StorageConfig,
}

impl CsvStore {
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }

    pub fn path_for(&self, category: Category) -> PathBuf {
        self.storage.store_path(category)
    }

    /// Creates the store with its header row if it does not exist yet.
    pub fn ensure(&self, category: Category) -> Result<(), AppError> {
        let path = self.path_for(category);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        file.write_all(&encode_row(category.header())?)?;
        file.sync_all()?;
        info!(category = %category, path = %path.display(), "Created store");
        Ok(())
    }

    /// Ensures the four stores in their fixed order.
    pub fn ensure_all(&self) -> Result<(), AppError> {
        Category::ALL
            .iter()
            .try_for_each(|category| self.ensure(*category))
    }

    /// Appends one record to its category's store.
    ///
    /// The header is checked first; a store whose first row is not the
    /// expected header is reported as corrupt and left untouched.
    pub fn append(&self, record: &Record) -> Result<(), AppError> {
        let category = record.category();
        let path = self.path_for(category);
        self.ensure(category)?;
        verify_header(category, &path)?;

        let row = record.to_row();
        debug_assert_eq!(row.len(), category.header().len());
        let bytes = encode_row(&row)?;

        let mut file = OpenOptions::new().read(true).append(true).open(&path)?;
        if !ends_with_newline(&mut file)? {
            return Err(AppError::CorruptStore {
                path: path.display().to_string(),
                reason: "last row is not terminated".to_string(),
            });
        }
        file.write_all(&bytes)?;
        file.sync_all()?;

        debug!(category = %category, path = %path.display(), "Appended row");
        Ok(())
    }

    /// Number of data rows, propagating any read or format error.
    ///
    /// An absent store has zero rows.
    pub fn try_count_rows(&self, category: Category) -> Result<usize, AppError> {
        let path = self.path_for(category);
        if !path.exists() {
            return Ok(0);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)?;
        let header = reader.headers()?;
        if !header.iter().eq(category.header().iter().copied()) {
            return Err(corrupt_header(&path));
        }

        let mut count = 0;
        for row in reader.records() {
            row?;
            count += 1;
        }
        Ok(count)
    }

    /// Number of data rows, or 0 if the store is absent or unreadable.
    pub fn count_rows(&self, category: Category) -> usize {
        match self.try_count_rows(category) {
            Ok(count) => count,
            Err(e) => {
                warn!(category = %category, "Could not count rows: {}", e);
                0
            }
        }
    }

    /// Row counts for every category. A failing store counts as 0 on its own.
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats::new();
        for category in Category::ALL {
            stats.record(category, self.count_rows(category));
        }
        stats
    }
}

/// Serializes one CSV row, newline-terminated.
fn encode_row<S: AsRef<str>>(fields: &[S]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(fields.iter().map(|f| AsRef::<str>::as_ref(f)))?;
    writer
        .into_inner()
        .map_err(|e| AppError::StorageError(e.into_error()))
}

fn verify_header(category: Category, path: &Path) -> Result<(), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    match reader.records().next() {
        Some(Ok(first)) if first.iter().eq(category.header().iter().copied()) => Ok(()),
        Some(Err(e)) => Err(e.into()),
        _ => Err(corrupt_header(path)),
    }
}

fn ends_with_newline(file: &mut File) -> Result<bool, AppError> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn corrupt_header(path: &Path) -> AppError {
    AppError::CorruptStore {
        path: path.display().to_string(),
        reason: "header row does not match".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dailydose_core::models::{
        timestamp_now, AdviceRecord, BookRecord, DogRecord, QuoteRecord, NO_DESCRIPTION, UNKNOWN,
    };
    use tempfile::{tempdir, TempDir};

    fn test_store() -> (CsvStore, TempDir) {
        let dir = tempdir().unwrap();
        let storage = StorageConfig {
            data_dir: dir.path().join("data"),
            log_dir: dir.path().join("log"),
        };
        (CsvStore::new(storage), dir)
    }

    fn advice(id: u64) -> Record {
        Record::Advice(AdviceRecord {
            id,
            text: format!("advice number {id}"),
            captured_at: timestamp_now(),
        })
    }

    fn book() -> Record {
        Record::Book(BookRecord {
            title: "Goblet of Fire".to_string(),
            author: UNKNOWN.to_string(),
            pages: "636".to_string(),
            release_date: "Jul 8, 2000".to_string(),
            description: "Line one, with a comma.\nLine \"two\".".to_string(),
            captured_at: timestamp_now(),
        })
    }

    fn first_line(path: &Path) -> String {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_ensure_creates_header_only_store() {
        let (store, _dir) = test_store();
        store.ensure(Category::Book).unwrap();

        let content = fs::read_to_string(store.path_for(Category::Book)).unwrap();
        assert_eq!(content, "Title,Author,Pages,Release Date,Description,Timestamp\n");
        assert_eq!(store.try_count_rows(Category::Book).unwrap(), 0);
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let (store, _dir) = test_store();
        store.ensure(Category::Advice).unwrap();
        let before = fs::read(store.path_for(Category::Advice)).unwrap();

        store.ensure(Category::Advice).unwrap();
        let after = fs::read(store.path_for(Category::Advice)).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_ensure_all_creates_every_store() {
        let (store, _dir) = test_store();
        store.ensure_all().unwrap();
        for category in Category::ALL {
            let path = store.path_for(category);
            assert!(path.exists(), "{} missing", path.display());
            assert_eq!(first_line(&path), category.header().join(","));
        }
    }

    #[test]
    fn test_append_increments_only_its_category() {
        let (store, _dir) = test_store();
        store.ensure_all().unwrap();

        store.append(&advice(1)).unwrap();
        store.append(&advice(2)).unwrap();
        store.append(&book()).unwrap();

        let stats = store.stats();
        assert_eq!(stats.advice, 2);
        assert_eq!(stats.books, 1);
        assert_eq!(stats.quotes, 0);
        assert_eq!(stats.dogs, 0);
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn test_append_creates_missing_store() {
        let (store, _dir) = test_store();
        store
            .append(&Record::Dog(DogRecord {
                image_url: "https://images.dog.ceo/breeds/pug/a.jpg".to_string(),
                breed: "Pug".to_string(),
                captured_at: timestamp_now(),
            }))
            .unwrap();

        let path = store.path_for(Category::Dog);
        assert_eq!(first_line(&path), "Image URL,Breed Info,Timestamp");
        assert_eq!(store.count_rows(Category::Dog), 1);
    }

    #[test]
    fn test_append_never_rewrites_header() {
        let (store, _dir) = test_store();
        for id in 0..5 {
            store.append(&advice(id)).unwrap();
        }
        let content = fs::read_to_string(store.path_for(Category::Advice)).unwrap();
        assert_eq!(content.matches("Id,Advice,Timestamp").count(), 1);
        assert!(content.starts_with("Id,Advice,Timestamp\n"));
    }

    #[test]
    fn test_multiline_field_is_one_row() {
        let (store, _dir) = test_store();
        store.append(&book()).unwrap();
        store.append(&book()).unwrap();

        assert_eq!(store.try_count_rows(Category::Book).unwrap(), 2);

        let mut reader = csv::Reader::from_path(store.path_for(Category::Book)).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.len(), 6);
        assert_eq!(&row[4], "Line one, with a comma.\nLine \"two\".");
    }

    #[test]
    fn test_quote_row_layout() {
        let (store, _dir) = test_store();
        store
            .append(&Record::Quote(QuoteRecord {
                text: "Keep going".to_string(),
                author: "Anonymous".to_string(),
                category: NO_DESCRIPTION.to_string(),
                captured_at: timestamp_now(),
            }))
            .unwrap();

        let mut reader = csv::Reader::from_path(store.path_for(Category::Quote)).unwrap();
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            vec!["Quote", "Author", "Category", "Timestamp"]
        );
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "Keep going");
        assert_eq!(&row[1], "Anonymous");
    }

    #[test]
    fn test_count_absent_store_is_zero() {
        let (store, _dir) = test_store();
        assert_eq!(store.try_count_rows(Category::Quote).unwrap(), 0);
        assert_eq!(store.count_rows(Category::Quote), 0);
    }

    #[test]
    fn test_count_corrupt_store_is_zero() {
        let (store, _dir) = test_store();
        store.ensure_all().unwrap();
        store.append(&advice(1)).unwrap();

        let path = store.path_for(Category::Quote);
        fs::write(&path, "Quote,Author,Category,Timestamp\na,b\nc,d,e,f,g\n").unwrap();

        assert!(store.try_count_rows(Category::Quote).is_err());
        assert_eq!(store.count_rows(Category::Quote), 0);
        assert_eq!(store.count_rows(Category::Quote), 0);
        // Other stores are unaffected.
        assert_eq!(store.count_rows(Category::Advice), 1);
        assert_eq!(store.stats().total(), 1);
    }

    #[test]
    fn test_count_wrong_header_is_zero() {
        let (store, _dir) = test_store();
        let path = store.path_for(Category::Dog);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "something,else,entirely\n1,2,3\n").unwrap();

        assert!(matches!(
            store.try_count_rows(Category::Dog),
            Err(AppError::CorruptStore { .. })
        ));
        assert_eq!(store.count_rows(Category::Dog), 0);
    }

    #[test]
    fn test_append_to_wrong_header_is_refused() {
        let (store, _dir) = test_store();
        let path = store.path_for(Category::Advice);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "Title,Author\n").unwrap();

        let result = store.append(&advice(9));

        assert!(matches!(result, Err(AppError::CorruptStore { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Title,Author\n");
    }

    #[test]
    fn test_append_to_empty_file_is_refused() {
        let (store, _dir) = test_store();
        let path = store.path_for(Category::Advice);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();

        assert!(store.append(&advice(1)).is_err());
        assert_eq!(store.count_rows(Category::Advice), 0);
    }

    #[test]
    fn test_append_after_truncated_row_is_refused() {
        let (store, _dir) = test_store();
        store.append(&advice(1)).unwrap();
        let path = store.path_for(Category::Advice);
        let mut content = fs::read_to_string(&path).unwrap();
        content.push_str("2,half a ro");
        fs::write(&path, &content).unwrap();

        let result = store.append(&advice(3));

        assert!(matches!(result, Err(AppError::CorruptStore { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_append_to_unwritable_location_fails() {
        let (store, dir) = test_store();
        // A plain file where the data directory should be.
        fs::write(dir.path().join("data"), "not a directory").unwrap();

        let result = store.append(&advice(1));
        assert!(matches!(result, Err(AppError::StorageError(_))));
    }
}
