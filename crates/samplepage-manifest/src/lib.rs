//! Manifest of demo samples.
//!
//! The manifest is a YAML sequence of records written by the external build,
//! one per sample, terminated by an `__end__` sentinel record.

pub mod loader;
pub mod record;

pub use loader::{load_manifest, parse_manifest, Manifest, ManifestError};
pub use record::{SampleRecord, END_SENTINEL, NO_IMAGE, WEB_TOOLCHAIN_TAG};
