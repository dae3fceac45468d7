//! The `Config` facade over a loaded data directory.
//!
//! Layout of a data directory:
//!
//! ```text
//! <data_dir>/config.json
//! <data_dir>/in/tables/<file>[.manifest]
//! <data_dir>/in/files/<id>_<name>[.manifest]
//! <data_dir>/in/state.json
//! <data_dir>/out/tables/<file>
//! <data_dir>/out/files/<file>
//! <data_dir>/out/state.json
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use kbc_types::{
    FileManifestArgs, InputFile, ResolvedOutputFile, ResolvedTable, StoredFileManifest,
    StoredTableManifest, TableManifestArgs,
};
use serde_json::{Map, Value};

use crate::dialect::{register_csv_dialect, CsvDialect};
use crate::error::ConfigError;
use crate::loader::{load_document, resolve_data_dir};
use crate::manifest_loader::{is_manifest, read_file_manifest, read_table_manifest};
use crate::manifest_writer;
use crate::schema::ConfigDocument;
use crate::state;

/// A loaded component configuration.
///
/// The document is read once in [`Config::new`] and never modified.
#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
    /// `data_dir` made absolute against the working directory at load time.
    root: PathBuf,
    document: ConfigDocument,
}

impl Config {
    /// Loads `config.json` from `data_dir`, or from `KBC_DATADIR` when
    /// `data_dir` is `None` or empty.
    ///
    /// # Errors
    ///
    /// Returns a setup error (`DataDirUnset`, `MissingConfig`) if the
    /// directory or file is missing and `Parse` if the JSON is malformed.
    pub fn new(data_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let data_dir = resolve_data_dir(data_dir)?;
        let document = load_document(&data_dir)?;
        Ok(Self::from_document(data_dir, document))
    }

    /// Loads the configuration from the directory named by `KBC_DATADIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(None)
    }

    /// Wraps an already parsed document.
    pub fn from_document(data_dir: impl Into<PathBuf>, document: ConfigDocument) -> Self {
        let data_dir = data_dir.into();
        Self {
            root: absolute_dir(&data_dir),
            data_dir,
            document,
        }
    }

    /// The parsed document.
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn parameters(&self) -> &Map<String, Value> {
        &self.document.parameters
    }

    /// The requested action, empty when none was given.
    pub fn action(&self) -> &str {
        &self.document.action
    }

    pub fn authorization(&self) -> &Map<String, Value> {
        &self.document.authorization
    }

    pub fn image_parameters(&self) -> &Map<String, Value> {
        &self.document.image_parameters
    }

    fn oauth_credentials(&self) -> Option<&Map<String, Value>> {
        self.document
            .authorization
            .get("oauth_api")?
            .get("credentials")?
            .as_object()
    }

    fn oauth_credential_str(&self, key: &str) -> &str {
        self.oauth_credentials()
            .and_then(|c| c.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The OAuth token payload (`credentials["#data"]`).
    ///
    /// The payload is usually a JSON-encoded string and is decoded here.
    /// Anything that does not decode to an object yields an empty mapping.
    pub fn oauthapi_data(&self) -> Map<String, Value> {
        match self.oauth_credentials().and_then(|c| c.get("#data")) {
            Some(Value::Object(data)) => data.clone(),
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(data)) => data,
                _ => {
                    tracing::warn!("oauth #data is not a JSON object, ignoring");
                    Map::new()
                }
            },
            _ => Map::new(),
        }
    }

    /// The OAuth application secret (`credentials["#appSecret"]`).
    pub fn oauthapi_appsecret(&self) -> &str {
        self.oauth_credential_str("#appSecret")
    }

    /// The OAuth application key (`credentials["appKey"]`).
    pub fn oauthapi_appkey(&self) -> &str {
        self.oauth_credential_str("appKey")
    }

    /// Declared input tables, resolved under `in/tables`.
    pub fn input_tables(&self) -> Vec<ResolvedTable> {
        let dir = self.root.join("in").join("tables");
        self.document
            .storage
            .input
            .tables
            .iter()
            .map(|t| ResolvedTable {
                full_path: dir.join(t.input_file_name()),
                descriptor: t.clone(),
            })
            .collect()
    }

    /// Declared output tables, resolved under `out/tables`.
    pub fn expected_output_tables(&self) -> Vec<ResolvedTable> {
        let dir = self.root.join("out").join("tables");
        self.document
            .storage
            .output
            .tables
            .iter()
            .map(|t| ResolvedTable {
                full_path: dir.join(t.output_file_name()),
                descriptor: t.clone(),
            })
            .collect()
    }

    /// Files downloaded into `in/files`, sorted by path.
    ///
    /// Sidecar manifests and subdirectories are skipped. A missing
    /// `in/files` directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the directory exists but cannot be read.
    pub fn input_files(&self) -> Result<Vec<InputFile>, ConfigError> {
        let dir = self.root.join("in").join("files");
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(|e| ConfigError::io(&dir, e))? {
            let path = entry.map_err(|e| ConfigError::io(&dir, e))?.path();
            if !path.is_file() || is_manifest(&path) {
                continue;
            }
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            files.push(InputFile {
                file_name,
                full_path: path,
            });
        }
        files.sort_by(|a, b| a.full_path.cmp(&b.full_path));
        Ok(files)
    }

    /// Declared output files, resolved under `out/files`.
    pub fn expected_output_files(&self) -> Vec<ResolvedOutputFile> {
        let dir = self.root.join("out").join("files");
        self.document
            .storage
            .output
            .files
            .iter()
            .map(|f| ResolvedOutputFile {
                full_path: dir.join(&f.source),
                descriptor: f.clone(),
            })
            .collect()
    }

    /// Finds a declared input table by file name or full path.
    ///
    /// A name without extension also matches `<name>.csv`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TableNotFound` if no declared table matches.
    pub fn input_table(&self, reference: impl AsRef<Path>) -> Result<ResolvedTable, ConfigError> {
        let reference = reference.as_ref();
        let name = file_name(reference).ok_or_else(|| ConfigError::TableNotFound {
            name: reference.display().to_string(),
        })?;
        let tables = self.input_tables();
        let with_csv = format!("{name}.csv");
        tables
            .iter()
            .find(|t| t.file_name() == Some(name))
            .or_else(|| tables.iter().find(|t| t.file_name() == Some(with_csv.as_str())))
            .cloned()
            .ok_or_else(|| ConfigError::TableNotFound {
                name: name.to_string(),
            })
    }

    /// Reads the sidecar manifest of a declared input table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TableNotFound` for undeclared tables and
    /// `ConfigError::ManifestNotFound` when the sidecar is missing.
    pub fn table_manifest(
        &self,
        reference: impl AsRef<Path>,
    ) -> Result<StoredTableManifest, ConfigError> {
        let table = self.input_table(reference)?;
        read_table_manifest(&table.full_path)
    }

    /// Reads the sidecar manifest of an input file, given its file name or
    /// full path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` if the file is not in `in/files`
    /// and `ConfigError::ManifestNotFound` when the sidecar is missing.
    pub fn file_manifest(
        &self,
        reference: impl AsRef<Path>,
    ) -> Result<StoredFileManifest, ConfigError> {
        let reference = reference.as_ref();
        let name = file_name(reference).ok_or_else(|| ConfigError::FileNotFound {
            name: reference.display().to_string(),
        })?;
        let file = self
            .input_files()?
            .into_iter()
            .find(|f| f.file_name == name)
            .ok_or_else(|| ConfigError::FileNotFound {
                name: name.to_string(),
            })?;
        read_file_manifest(&file.full_path)
    }

    /// State left by the previous run (`in/state.json`), empty if none.
    pub fn state(&self) -> Result<Map<String, Value>, ConfigError> {
        state::read_state(&self.root)
    }

    /// Persists state for the next run (`out/state.json`).
    pub fn write_state(&self, state: &Map<String, Value>) -> Result<PathBuf, ConfigError> {
        state::write_state(&self.root, state)
    }

    /// See [`manifest_writer::write_file_manifest`].
    pub fn write_file_manifest(
        &self,
        path: impl AsRef<Path>,
        args: FileManifestArgs,
    ) -> Result<PathBuf, ConfigError> {
        manifest_writer::write_file_manifest(path.as_ref(), args)
    }

    /// See [`manifest_writer::write_table_manifest`].
    pub fn write_table_manifest(
        &self,
        path: impl AsRef<Path>,
        args: TableManifestArgs,
    ) -> Result<PathBuf, ConfigError> {
        manifest_writer::write_table_manifest(path.as_ref(), args)
    }

    /// Registers the `kbc` CSV dialect. Idempotent.
    pub fn register_csv_dialect(&self) -> CsvDialect {
        register_csv_dialect()
    }

    /// Opens a declared input table for reading with the `kbc` dialect.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TableNotFound` for undeclared tables and
    /// `ConfigError::Csv` if the file cannot be opened.
    pub fn table_reader(
        &self,
        reference: impl AsRef<Path>,
    ) -> Result<csv::Reader<File>, ConfigError> {
        let table = self.input_table(reference)?;
        self.register_csv_dialect()
            .reader_builder()
            .from_path(&table.full_path)
            .map_err(|e| ConfigError::Csv {
                path: table.full_path.clone(),
                source: e,
            })
    }

    /// Creates an output table file with the `kbc` dialect.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Csv` if the file cannot be created.
    pub fn table_writer(&self, path: impl AsRef<Path>) -> Result<csv::Writer<File>, ConfigError> {
        let path = path.as_ref();
        self.register_csv_dialect()
            .writer_builder()
            .from_path(path)
            .map_err(|e| ConfigError::Csv {
                path: path.to_path_buf(),
                source: e,
            })
    }
}

fn absolute_dir(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            tracing::warn!(error = %e, "working directory unavailable, keeping relative data dir");
            path.to_path_buf()
        }
    }
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
