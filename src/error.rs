use std::{fmt, io};

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum WnError {
    #[error("XML parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("Lookup failed: {0}")]
    Lookup(String),
    #[error("Cannot serialize: {0}")]
    Serialization(String),
    #[error("Invalid command: {0}")]
    Command(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WnError {
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        WnError::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WnError::Parse { .. } => "ParseError",
            WnError::Lookup(_) => "LookupError",
            WnError::Serialization(_) => "SerializationError",
            WnError::Command(_) => "CommandError",
            WnError::Io(_) => "IoError",
            WnError::Config(_) => "ConfigError",
        }
    }
}

impl From<io::Error> for WnError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => WnError::Io(format!("not found: {x}")),
            io::ErrorKind::PermissionDenied => WnError::Io(format!("permission denied: {x}")),
            _ => WnError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for WnError {
    fn from(x: fmt::Error) -> Self {
        WnError::Serialization(format!("{x}"))
    }
}

impl From<toml::de::Error> for WnError {
    fn from(src: toml::de::Error) -> WnError {
        WnError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for WnError {
    fn from(src: toml::ser::Error) -> WnError {
        WnError::Config(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for WnError {
    fn from(src: JsonError) -> WnError {
        WnError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}
