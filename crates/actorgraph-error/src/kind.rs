//! Error kinds for actorgraph operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to pick an exit path; the CLI maps every kind
/// to exit code 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // Usage errors
    // =========================================================================
    /// Two command-line options that cannot be combined
    ConflictingOptions,

    // =========================================================================
    // Repository errors
    // =========================================================================
    /// No repository manifest found in the directory or any ancestor
    RepositoryNotFound,

    /// The manifest exists but could not be parsed
    ManifestInvalid,

    /// A linked repository could not be resolved
    LinkUnresolved,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    // =========================================================================
    // Serialization errors
    // =========================================================================
    /// Serialization failed
    SerializationFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}
