//! Named CSV dialects for reading and writing table files.
//!
//! Table files exchanged with Storage use the `kbc` dialect: comma
//! delimited, `"`-quoted, quotes escaped by doubling, `\n` line endings.

use std::collections::BTreeMap;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Name under which [`CsvDialect::kbc`] is registered.
pub const KBC_DIALECT: &str = "kbc";

/// A CSV formatting convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDialect {
    pub name: String,
    pub delimiter: u8,
    pub quote: u8,
    /// Escape quotes by doubling them (`""`).
    pub double_quote: bool,
    /// Escape character, only used when `double_quote` is off.
    pub escape: Option<u8>,
    pub line_terminator: u8,
}

impl CsvDialect {
    /// The dialect of table files in the data directory.
    pub fn kbc() -> Self {
        Self {
            name: KBC_DIALECT.to_string(),
            delimiter: b',',
            quote: b'"',
            double_quote: true,
            escape: None,
            line_terminator: b'\n',
        }
    }

    /// A reader builder configured for this dialect.
    ///
    /// Readers accept `\n`, `\r` and `\r\n` regardless of `line_terminator`.
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(self.double_quote)
            .escape(self.escape)
            .terminator(csv::Terminator::CRLF);
        builder
    }

    /// A writer builder configured for this dialect.
    pub fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(self.double_quote)
            .terminator(csv::Terminator::Any(self.line_terminator));
        if let Some(escape) = self.escape {
            builder.escape(escape);
        }
        builder
    }
}

fn registry() -> &'static RwLock<BTreeMap<String, CsvDialect>> {
    static REGISTRY: OnceLock<RwLock<BTreeMap<String, CsvDialect>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(BTreeMap::new()))
}

/// Registers `dialect` under its name, replacing any previous entry.
pub fn register_dialect(dialect: CsvDialect) {
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(dialect.name.clone(), dialect);
}

/// Registers the `kbc` dialect. Idempotent.
pub fn register_csv_dialect() -> CsvDialect {
    let dialect = CsvDialect::kbc();
    register_dialect(dialect.clone());
    dialect
}

/// Looks up a registered dialect.
pub fn get_dialect(name: &str) -> Option<CsvDialect> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// Names of all registered dialects, sorted.
pub fn list_dialects() -> Vec<String> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_twice_keeps_single_entry() {
        register_csv_dialect();
        register_csv_dialect();
        let count = list_dialects().iter().filter(|n| *n == KBC_DIALECT).count();
        assert_eq!(count, 1);
        assert_eq!(get_dialect(KBC_DIALECT), Some(CsvDialect::kbc()));
    }

    #[test]
    fn unknown_dialect_is_none() {
        assert!(get_dialect("excel-tab").is_none());
    }

    #[test]
    fn writer_quotes_and_uses_newline() {
        let mut writer = CsvDialect::kbc().writer_builder().from_writer(Vec::new());
        writer.write_record(["id", "say \"hi\""]).expect("write");
        writer.write_record(["1", "a,b"]).expect("write");
        let out = String::from_utf8(writer.into_inner().expect("flush")).expect("utf8");
        assert_eq!(out, "id,\"say \"\"hi\"\"\"\n1,\"a,b\"\n");
    }

    #[test]
    fn reader_handles_crlf_and_doubled_quotes() {
        let data = "id,text\r\n1,\"x \"\"y\"\"\"\r\n";
        let mut reader = CsvDialect::kbc().reader_builder().from_reader(data.as_bytes());
        let headers = reader.headers().expect("headers").clone();
        assert_eq!(headers.len(), 2);
        let row = reader.records().next().expect("row").expect("parse");
        assert_eq!(&row[1], "x \"y\"");
    }
}
