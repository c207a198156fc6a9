//! Deploy pipeline for the samples webpage.
//!
//! Runs the external web builds, then assembles the deploy directory from
//! the manifest, the project's web templates and the build outputs.

pub mod assets;
pub mod builder;
pub mod collector;
pub mod target;
pub mod templates;
pub mod toolchain;

mod io;

pub use assets::{AssetExportConfig, AssetExporter};
pub use builder::{BuildResult, DeployConfig, DeployError, DeployPipeline};
pub use collector::{ArtifactCollector, CollectReport};
pub use target::{Artifact, Target};
pub use templates::{render, GalleryRenderer, ParentGallery, RenderError, Substitution};
pub use toolchain::{BuildDriver, BuildOrchestrator, CommandDriver, EmscriptenToolchain, Toolchain};
