//! Raw tabular feed input.
//!
//! The core consumes a feed as six independently-optional tables of string
//! rows. Archive extraction and on-disk layout belong to the feed loader;
//! the store only ever sees [`FeedTables`].

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("cannot access feed directory {0}: {1}")]
    Inaccessible(PathBuf, std::io::Error),
}

/// One tabular feed resource: a header row plus string records.
#[derive(Debug, Default, Clone)]
pub struct RawTable {
    columns: HashMap<String, usize>,
    rows: Vec<csv::StringRecord>,
}

impl RawTable {
    /// Parse CSV bytes. Tolerates a leading UTF-8 BOM and ragged rows; rows
    /// that fail to parse are skipped, so a structurally unreadable stream
    /// degrades to however many rows could be read (possibly none).
    pub fn from_csv_reader<R: Read>(reader: R) -> Self {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let mut columns = HashMap::new();
        if let Ok(headers) = csv_reader.headers() {
            for (idx, name) in headers.iter().enumerate() {
                // utf-8-sig feeds carry a BOM on the first header field.
                let name = name.trim_start_matches('\u{feff}').trim();
                columns.insert(name.to_owned(), idx);
            }
        }
        let rows = csv_reader.into_records().filter_map(Result::ok).collect();

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate data rows as column-addressable views.
    pub fn rows<'a>(&'a self) -> impl Iterator<Item = RawRow<'a>> + 'a {
        self.rows.iter().map(move |record| RawRow { table: self, record })
    }
}

/// Borrowed view of one data row; fields are looked up by header name.
#[derive(Clone, Copy)]
pub struct RawRow<'a> {
    table: &'a RawTable,
    record: &'a csv::StringRecord,
}

impl<'a> RawRow<'a> {
    /// The field under `column`, or `None` when the column is absent from the
    /// header, the row is too short, or the field is empty.
    pub fn field(&self, column: &str) -> Option<&'a str> {
        let idx = *self.table.columns.get(column)?;
        match self.record.get(idx) {
            Some("") | None => None,
            Some(value) => Some(value),
        }
    }
}

/// The six raw tables of a feed. Any table may be absent.
#[derive(Debug, Default, Clone)]
pub struct FeedTables {
    pub stops: Option<RawTable>,
    pub routes: Option<RawTable>,
    pub trips: Option<RawTable>,
    pub stop_times: Option<RawTable>,
    pub calendar: Option<RawTable>,
    pub shapes: Option<RawTable>,
}

/// Produces the six feed tables, hiding archive and filesystem concerns.
pub trait FeedLoader {
    fn load_tables(&self) -> Result<FeedTables, FeedError>;
}

/// Reads `<table>.txt` members from an extracted feed directory.
///
/// A missing member yields an absent table; an unreadable one degrades to an
/// empty table rather than failing the load.
pub struct DirFeedLoader {
    dir: PathBuf,
}

impl DirFeedLoader {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn read_table(&self, name: &str) -> Option<RawTable> {
        let path = self.dir.join(format!("{name}.txt"));
        if !path.is_file() {
            return None;
        }
        match File::open(&path) {
            Ok(file) => Some(RawTable::from_csv_reader(file)),
            Err(e) => {
                log::warn!("failed to open {}: {e}", path.display());
                Some(RawTable::default())
            }
        }
    }
}

impl FeedLoader for DirFeedLoader {
    fn load_tables(&self) -> Result<FeedTables, FeedError> {
        if !self.dir.is_dir() {
            return Err(FeedError::Inaccessible(
                self.dir.clone(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        Ok(FeedTables {
            stops: self.read_table("stops"),
            routes: self.read_table("routes"),
            trips: self.read_table("trips"),
            stop_times: self.read_table("stop_times"),
            calendar: self.read_table("calendar"),
            shapes: self.read_table("shapes"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_by_column_name() {
        let table = RawTable::from_csv_reader("stop_id,stop_name\nS1,Alpha\nS2,Beta\n".as_bytes());
        assert_eq!(table.len(), 2);
        let ids: Vec<_> = table.rows().map(|row| row.field("stop_id").unwrap()).collect();
        assert_eq!(ids, ["S1", "S2"]);
    }

    #[test]
    fn strips_leading_bom_from_header() {
        let table = RawTable::from_csv_reader("\u{feff}stop_id,stop_name\nS1,Alpha\n".as_bytes());
        let row = table.rows().next().unwrap();
        assert_eq!(row.field("stop_id"), Some("S1"));
    }

    #[test]
    fn missing_and_empty_fields_read_as_none() {
        let table = RawTable::from_csv_reader("stop_id,stop_name,stop_desc\nS1,,\n".as_bytes());
        let row = table.rows().next().unwrap();
        assert_eq!(row.field("stop_name"), None);
        assert_eq!(row.field("no_such_column"), None);
    }

    #[test]
    fn tolerates_ragged_rows() {
        let table = RawTable::from_csv_reader("stop_id,stop_name\nS1\nS2,Beta,extra\n".as_bytes());
        assert_eq!(table.len(), 2);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].field("stop_name"), None);
        assert_eq!(rows[1].field("stop_name"), Some("Beta"));
    }

    #[test]
    fn unreadable_bytes_degrade_to_empty() {
        let table = RawTable::from_csv_reader(&b"\xff\xfe\x00\xff"[..]);
        assert!(table.is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let loader = DirFeedLoader::new("/definitely/not/a/feed/dir");
        assert!(loader.load_tables().is_err());
    }
}
