//! Collects build outputs, static files and screenshots into the deploy
//! directory, and writes the generated pages.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use samplepage_manifest::{Manifest, SampleRecord};

use crate::builder::{DeployConfig, DeployError};
use crate::io;
use crate::target::Target;
use crate::templates::{render, GalleryRenderer, Substitution};

/// Support files copied verbatim from the project's web directory.
pub const STATIC_FILES: &[&str] = &[
    "style.css",
    "dummy.jpg",
    "emsc.js",
    "wasm.js",
    "about.html",
    "favicon.png",
    "core_samples.jpg",
];

/// Page shell template in the project's web directory.
const INDEX_TEMPLATE: &str = "index.html";

/// What a collection pass produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectReport {
    /// Per-sample target pages written
    pub pages: usize,

    /// Build artifacts copied
    pub copied: usize,

    /// Build artifacts expected but absent from the build output
    pub skipped: usize,
}

pub struct ArtifactCollector<'a> {
    config: &'a DeployConfig,
    manifest: &'a Manifest,
}

impl<'a> ArtifactCollector<'a> {
    pub fn new(config: &'a DeployConfig, manifest: &'a Manifest) -> Self {
        Self { config, manifest }
    }

    /// Populate the deploy directory.
    ///
    /// Target pages are only generated for enabled targets, and only when
    /// the web toolchain is available.
    pub fn collect(&self, toolchain_available: bool) -> Result<CollectReport, DeployError> {
        let mut report = CollectReport::default();

        for target in Target::ALL {
            io::create_dir_all(&self.target_dir(target))?;
        }

        self.write_index()?;
        self.copy_static_files()?;

        if toolchain_available {
            for target in Target::ALL {
                if self.config.target_enabled(target) {
                    self.collect_target(target, &mut report)?;
                }
            }
        }

        self.copy_screenshots()?;

        Ok(report)
    }

    fn target_dir(&self, target: Target) -> PathBuf {
        self.config.deploy_dir.join(target.dir_name())
    }

    fn write_index(&self) -> Result<(), DeployError> {
        let enabled: Vec<Target> = Target::ALL
            .into_iter()
            .filter(|t| self.config.target_enabled(*t))
            .collect();

        let samples = GalleryRenderer::new()?.render(
            self.manifest,
            &enabled,
            &self.config.parent_gallery,
        )?;

        let template = io::read_to_string(&self.config.web_dir().join(INDEX_TEMPLATE))?;
        let vars = HashMap::from([("samples", samples.as_str())]);
        let html = render(&template, &vars, Substitution::Partial)?;

        io::write(&self.config.deploy_dir.join(INDEX_TEMPLATE), &html)
    }

    fn copy_static_files(&self) -> Result<(), DeployError> {
        let web_dir = self.config.web_dir();

        for name in STATIC_FILES {
            tracing::info!("> copy file: {}", name);
            io::copy(&web_dir.join(name), &self.config.deploy_dir.join(name))?;
        }

        Ok(())
    }

    fn collect_target(&self, target: Target, report: &mut CollectReport) -> Result<(), DeployError> {
        let build_dir = self
            .config
            .build_output_dir
            .join(self.config.build_config(target));
        let out_dir = self.target_dir(target);
        let mut template: Option<String> = None;

        for sample in self.manifest.web_samples() {
            tracing::info!("> generate {} HTML page: {}", target.label(), sample.name);

            self.copy_artifacts(target, &sample.name, &build_dir, &out_dir, report)?;

            // only needed once a tagged sample exists
            if template.is_none() {
                let path = self.config.web_dir().join(target.page_template());
                template = Some(io::read_to_string(&path)?);
            }
            let html = self.render_sample_page(template.as_deref().unwrap_or_default(), sample)?;
            io::write(&out_dir.join(format!("{}.html", sample.name)), &html)?;
            report.pages += 1;
        }

        Ok(())
    }

    fn copy_artifacts(
        &self,
        target: Target,
        name: &str,
        build_dir: &Path,
        out_dir: &Path,
        report: &mut CollectReport,
    ) -> Result<(), DeployError> {
        for artifact in target.artifacts() {
            let source = build_dir.join(artifact.source_name(name));
            if source.is_file() {
                io::copy(&source, &out_dir.join(artifact.deploy_name(name)))?;
                report.copied += 1;
            } else {
                report.skipped += 1;
            }
        }

        Ok(())
    }

    fn render_sample_page(&self, template: &str, sample: &SampleRecord) -> Result<String, DeployError> {
        let source = format!("{}{}", self.config.source_url, sample.source_path);
        let vars = HashMap::from([("name", sample.name.as_str()), ("source", source.as_str())]);

        Ok(render(template, &vars, Substitution::Partial)?)
    }

    fn copy_screenshots(&self) -> Result<(), DeployError> {
        for sample in self.manifest.samples() {
            if let Some(file_name) = sample.image_file_name() {
                tracing::info!("> copy screenshot: {}", file_name);
                let source = self.config.project_dir.join(&sample.image_path);
                io::copy(&source, &self.config.deploy_dir.join(file_name))?;
            }
        }

        Ok(())
    }
}
