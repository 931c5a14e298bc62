use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("path must be a non-empty string ({reason})")]
    InvalidInput { reason: &'static str },
    #[error(
        "No filesystem paths are configured. Set FLOW_ALLOWED_PATHS to a comma-separated list of directories that may be accessed."
    )]
    NotConfigured,
    #[error("Access denied: {path} is not inside any allowed directory")]
    AccessDenied { path: String },
    #[error("File too large: {size} bytes (maximum {max} bytes)")]
    TooLarge { size: u64, max: u64 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl GuardError {
    pub fn code(&self) -> &'static str {
        match self {
            GuardError::InvalidInput { .. } => "InvalidInput",
            GuardError::NotConfigured => "NotConfigured",
            GuardError::AccessDenied { .. } => "AccessDenied",
            GuardError::TooLarge { .. } => "TooLarge",
            GuardError::Io(_) => "Io",
        }
    }
}

pub type GuardResult<T> = Result<T, GuardError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("schema {file} has no string at properties.schema.const")]
    SchemaMalformed { file: String },
    #[error("schema key {key} is declared by both {first} and {second}")]
    DuplicateSchemaKey { key: String, first: String, second: String },
    #[error("schema {key} does not compile: {reason}")]
    SchemaInvalid { key: String, reason: String },
    #[error("fixture {fixture} has no top-level \"schema\" string")]
    MissingSchemaKey { fixture: String },
    #[error("fixture {fixture} references unknown schema {key}")]
    UnknownSchemaKey { fixture: String, key: String },
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("writing report: {0}")]
    Output(#[source] io::Error),
    #[error("parsing {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl HarnessError {
    pub fn code(&self) -> &'static str {
        match self {
            HarnessError::SchemaMalformed { .. } => "SchemaMalformed",
            HarnessError::DuplicateSchemaKey { .. } => "DuplicateSchemaKey",
            HarnessError::SchemaInvalid { .. } => "SchemaInvalid",
            HarnessError::MissingSchemaKey { .. } => "MissingSchemaKey",
            HarnessError::UnknownSchemaKey { .. } => "UnknownSchemaKey",
            HarnessError::Io { .. } => "Io",
            HarnessError::Output(_) => "Output",
            HarnessError::Json { .. } => "Json",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HarnessError::Io { path: path.into(), source }
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
