//! Deploy pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use samplepage_manifest::{load_manifest, ManifestError};

use crate::assets::{AssetExportConfig, AssetExporter};
use crate::collector::ArtifactCollector;
use crate::io;
use crate::target::Target;
use crate::templates::{ParentGallery, RenderError};
use crate::toolchain::{BuildDriver, BuildOrchestrator, CommandDriver, EmscriptenToolchain, Toolchain};

/// Configuration for assembling the webpage.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Project directory containing `web/` and `data/`
    pub project_dir: PathBuf,

    /// Deploy root, cleared on every run
    pub deploy_dir: PathBuf,

    /// Directory holding one build output subdirectory per build configuration
    pub build_output_dir: PathBuf,

    /// Manifest file name inside the deploy root
    pub manifest_name: String,

    /// Prefix for sample source links
    pub source_url: String,

    /// Build and deploy the asm.js target
    pub build_asmjs: bool,

    /// Build and deploy the WebAssembly target
    pub build_wasm: bool,

    /// Export the project's data files
    pub export_assets: bool,

    /// Build configuration name for asm.js
    pub asmjs_config: String,

    /// Build configuration name for WebAssembly
    pub wasm_config: String,

    /// External build driver executable
    pub driver: PathBuf,

    /// Emscripten SDK directory; `emcc` is looked up on `PATH` when unset
    pub sdk_dir: Option<PathBuf>,

    pub assets: AssetExportConfig,

    pub parent_gallery: ParentGallery,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self::for_project(".")
    }
}

impl DeployConfig {
    /// Defaults for a project at `project_dir`. The deploy and build output
    /// directories live in `fips-deploy/` next to the project.
    pub fn for_project(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let workspace = if project_dir == Path::new(".") {
            PathBuf::from("..")
        } else {
            project_dir.join("..")
        };

        Self {
            deploy_dir: workspace.join("fips-deploy/oryol-samples-webpage"),
            build_output_dir: workspace.join("fips-deploy/oryol-samples"),
            project_dir,
            manifest_name: "websamples.yml".to_string(),
            source_url: "https://github.com/floooh/oryol-samples/tree/master/src/".to_string(),
            build_asmjs: true,
            build_wasm: true,
            export_assets: true,
            asmjs_config: "webgl2-emsc-ninja-release".to_string(),
            wasm_config: "webgl2-wasm-ninja-release".to_string(),
            driver: PathBuf::from("./fips"),
            sdk_dir: None,
            assets: AssetExportConfig::default(),
            parent_gallery: ParentGallery::default(),
        }
    }

    pub fn target_enabled(&self, target: Target) -> bool {
        match target {
            Target::AsmJs => self.build_asmjs,
            Target::Wasm => self.build_wasm,
        }
    }

    /// Build configuration name for a target.
    pub fn build_config(&self, target: Target) -> &str {
        match target {
            Target::AsmJs => &self.asmjs_config,
            Target::Wasm => &self.wasm_config,
        }
    }

    pub fn web_dir(&self) -> PathBuf {
        self.project_dir.join("web")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.deploy_dir.join(&self.manifest_name)
    }
}

/// Result of a deploy run.
#[derive(Debug)]
pub struct BuildResult {
    /// Samples listed in the manifest
    pub samples: usize,

    /// Per-sample target pages generated
    pub pages: usize,

    /// Build artifacts copied
    pub copied: usize,

    /// Build artifacts missing from the build output
    pub skipped: usize,

    /// Total time in milliseconds
    pub duration_ms: u64,

    /// Deploy directory
    pub output_dir: PathBuf,
}

/// Errors that can occur while deploying.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("Failed to copy {from} to {to}: {message}")]
    CopyError {
        from: String,
        to: String,
        message: String,
    },

    #[error("Destination already exists: {0}")]
    DestinationExists(String),

    #[error("Build driver failed for {config}: {message}")]
    DriverError { config: String, message: String },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Builds the web targets and assembles the deploy directory.
pub struct DeployPipeline {
    config: DeployConfig,
    driver: Box<dyn BuildDriver + Send>,
    toolchain: Box<dyn Toolchain + Send>,
}

impl DeployPipeline {
    /// Create a pipeline driving the configured external build tool.
    pub fn new(config: DeployConfig) -> Self {
        let driver = CommandDriver::new(&config.driver, &config.project_dir);
        let toolchain = EmscriptenToolchain::new(config.sdk_dir.clone());

        Self {
            config,
            driver: Box::new(driver),
            toolchain: Box::new(toolchain),
        }
    }

    pub fn with_driver(mut self, driver: impl BuildDriver + Send + 'static) -> Self {
        self.driver = Box::new(driver);
        self
    }

    pub fn with_toolchain(mut self, toolchain: impl Toolchain + Send + 'static) -> Self {
        self.toolchain = Box::new(toolchain);
        self
    }

    /// Run the pipeline.
    ///
    /// Steps run in order and the first failure aborts; whatever was written
    /// to the deploy directory up to that point is left in place.
    pub fn run(&self) -> Result<BuildResult, DeployError> {
        let start = Instant::now();
        let config = &self.config;

        self.prepare_deploy_dir()?;

        let toolchain_available = self.toolchain.is_available();
        if !toolchain_available && (config.build_asmjs || config.build_wasm) {
            tracing::warn!("Web toolchain not found, skipping web target builds");
        }

        let built = BuildOrchestrator::new(self.driver.as_ref())
            .build_targets(config, toolchain_available)?;
        tracing::debug!("Built targets: {:?}", built);

        if config.export_assets {
            AssetExporter::new(&config.assets).export(
                &config.project_dir.join("data"),
                &config.deploy_dir.join("data"),
            )?;
        }

        let manifest = load_manifest(&config.manifest_path())?;
        let report = ArtifactCollector::new(config, &manifest).collect(toolchain_available)?;

        if report.skipped > 0 {
            tracing::info!(
                "{} expected build artifacts were not found and were skipped",
                report.skipped
            );
        }

        Ok(BuildResult {
            samples: manifest.samples().count(),
            pages: report.pages,
            copied: report.copied,
            skipped: report.skipped,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: config.deploy_dir.clone(),
        })
    }

    fn prepare_deploy_dir(&self) -> Result<(), DeployError> {
        let dir = &self.config.deploy_dir;

        if dir.is_dir() {
            fs::remove_dir_all(dir).map_err(|e| DeployError::WriteError {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?;
        }

        io::create_dir_all(dir)
    }
}
