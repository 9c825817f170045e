//! # actorgraph-error
//!
//! Unified error handling for actorgraph.
//!
//! - **ErrorKind**: what went wrong (e.g. `ManifestInvalid`, `ConflictingOptions`)
//! - **Error context**: operation name plus key/value pairs pointing at the cause
//! - **Error source**: the wrapped underlying error, never leaked as a raw type
//!
//! ## Usage
//!
//! ```rust
//! use actorgraph_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ManifestInvalid, "missing field `name`")
//!         .with_operation("repository::load")
//!         .with_context("manifest", "repo/repository.toml"))
//! }
//! ```
//!
//! The graph core never fails; errors only come from loading repositories and
//! from the command-line surface.

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using the actorgraph Error
pub type Result<T> = std::result::Result<T, Error>;
