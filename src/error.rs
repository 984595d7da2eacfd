//! Error taxonomy shared by the registry, engine, generator and pipeline.
//!
//! Each enum maps to one propagation policy:
//!
//! - [`ConfigurationError`]: the catalog and its drawers disagree. Raised while
//!   building the registry or the drawer table; the process cannot proceed.
//! - [`InputError`]: a request is malformed. Reported to the caller, nothing
//!   is started and no state changes.
//! - [`EngineError`]: the rendering backend failed. Aborts the current run
//!   without delivering a partial archive; never retried automatically.
//! - [`ArchiveError`]: the archive writer failed. Handled like an engine error.
//!
//! [`Error`] wraps all of them and adds [`Error::Busy`].

use thiserror::Error;

/// The category catalog and the drawer table are inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("category registry is empty")]
    EmptyRegistry,

    #[error("category at position {position} has id {id}; ids must be contiguous from 0")]
    NonContiguousId { position: usize, id: usize },

    #[error("category at position {position} has an empty key")]
    EmptyKey { position: usize },

    #[error("category key `{0}` is registered more than once")]
    DuplicateKey(String),

    #[error("category `{0}` has no drawer")]
    MissingDrawer(String),

    #[error("category `{0}` has more than one drawer")]
    DuplicateDrawer(String),

    #[error("drawer assigned to unknown category `{0}`")]
    UnknownDrawerKey(String),
}

/// A user request that cannot be turned into a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("no categories selected")]
    EmptySelection,

    #[error("unknown category id {id} (registry has {len} categories)")]
    UnknownCategory { id: usize, len: usize },

    #[error("category id `{0}` is not a non-negative integer")]
    InvalidCategoryId(String),

    #[error("{field} must be a number, got `{value}`")]
    NotNumeric { field: &'static str, value: String },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: i64 },
}

/// The rendering backend failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("rendering engine failed to initialize: {0}")]
    InitFailed(String),

    #[error("cannot allocate a {size}x{size} surface")]
    SurfaceAllocation { size: u32 },

    #[error("surface pixel buffer is unavailable")]
    SurfaceUnavailable,

    #[error("icon encoding failed: {0}")]
    Encode(String),
}

/// The archive writer failed.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive write failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("archive I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("file `{0}` added before any folder")]
    NoFolder(String),
}

/// Top-level error returned by the generator and the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("a generation run is already in progress")]
    Busy,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_render_field_names() {
        let err = InputError::NotNumeric {
            field: "count",
            value: "ten".into(),
        };
        assert_eq!(err.to_string(), "count must be a number, got `ten`");

        let err = InputError::NotPositive {
            field: "size",
            value: -3,
        };
        assert_eq!(err.to_string(), "size must be positive, got -3");
    }

    #[test]
    fn top_level_error_is_transparent() {
        let err: Error = EngineError::SurfaceUnavailable.into();
        assert_eq!(err.to_string(), "surface pixel buffer is unavailable");
        assert!(matches!(err, Error::Engine(EngineError::SurfaceUnavailable)));
    }
}
