//! Optional `samplepage.toml` configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use samplepage_static::{DeployConfig, ParentGallery};
use serde::Deserialize;

/// Configuration file structure. Every key is optional and falls back to
/// the pipeline defaults.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    project: ProjectSection,
    #[serde(default)]
    deploy: DeploySection,
    #[serde(default)]
    targets: TargetsSection,
    #[serde(default)]
    driver: DriverSection,
    #[serde(default)]
    source: SourceSection,
    #[serde(default)]
    assets: AssetsSection,
    #[serde(default)]
    gallery: GallerySection,
}

#[derive(Debug, Deserialize, Default)]
struct ProjectSection {
    dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct DeploySection {
    dir: Option<PathBuf>,
    build_output: Option<PathBuf>,
    manifest: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TargetsSection {
    asmjs: Option<bool>,
    wasm: Option<bool>,
    export_assets: Option<bool>,
    asmjs_config: Option<String>,
    wasm_config: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct DriverSection {
    program: Option<PathBuf>,
    sdk_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceSection {
    url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct AssetsSection {
    extensions: Option<Vec<String>>,
    dirs: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
struct GallerySection {
    parent_title: Option<String>,
    parent_url: Option<String>,
    parent_image: Option<String>,
}

impl ConfigFile {
    /// Apply the file's settings on top of the pipeline defaults.
    pub fn into_deploy_config(self) -> DeployConfig {
        let mut config = match self.project.dir {
            Some(dir) => DeployConfig::for_project(dir),
            None => DeployConfig::default(),
        };
        let parent = ParentGallery::default();

        if let Some(dir) = self.deploy.dir {
            config.deploy_dir = dir;
        }
        if let Some(dir) = self.deploy.build_output {
            config.build_output_dir = dir;
        }
        if let Some(name) = self.deploy.manifest {
            config.manifest_name = name;
        }

        config.build_asmjs = self.targets.asmjs.unwrap_or(config.build_asmjs);
        config.build_wasm = self.targets.wasm.unwrap_or(config.build_wasm);
        config.export_assets = self.targets.export_assets.unwrap_or(config.export_assets);
        if let Some(name) = self.targets.asmjs_config {
            config.asmjs_config = name;
        }
        if let Some(name) = self.targets.wasm_config {
            config.wasm_config = name;
        }

        if let Some(program) = self.driver.program {
            config.driver = program;
        }
        config.sdk_dir = self.driver.sdk_dir;

        if let Some(url) = self.source.url {
            config.source_url = url;
        }

        if let Some(extensions) = self.assets.extensions {
            config.assets.extensions = extensions;
        }
        if let Some(dirs) = self.assets.dirs {
            config.assets.dirs = dirs;
        }

        config.parent_gallery = ParentGallery {
            title: self.gallery.parent_title.unwrap_or(parent.title),
            url: self.gallery.parent_url.unwrap_or(parent.url),
            image: self.gallery.parent_image.unwrap_or(parent.image),
        };

        config
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("samplepage.toml"))
            .unwrap()
            .into_deploy_config();

        let defaults = DeployConfig::default();
        assert_eq!(config.deploy_dir, defaults.deploy_dir);
        assert_eq!(config.asmjs_config, "webgl2-emsc-ninja-release");
        assert!(config.build_asmjs && config.build_wasm && config.export_assets);
        assert_eq!(config.parent_gallery, ParentGallery::default());
    }

    #[test]
    fn overrides_selected_keys() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("samplepage.toml");
        fs::write(
            &path,
            r#"
[deploy]
dir = "out/webpage"

[targets]
asmjs = false
wasm_config = "wasm-debug"

[driver]
sdk_dir = "sdks/emsdk"

[assets]
dirs = []

[gallery]
parent_title = "Back"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap().into_deploy_config();

        assert_eq!(config.deploy_dir, PathBuf::from("out/webpage"));
        assert!(!config.build_asmjs);
        assert!(config.build_wasm);
        assert_eq!(config.wasm_config, "wasm-debug");
        assert_eq!(config.sdk_dir, Some(PathBuf::from("sdks/emsdk")));
        assert!(config.assets.dirs.is_empty());
        assert_eq!(config.assets.extensions.len(), 5);
        assert_eq!(config.parent_gallery.title, "Back");
        assert_eq!(config.parent_gallery.image, "core_samples.jpg");
    }

    #[test]
    fn deploy_dirs_follow_project_dir() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("samplepage.toml");
        fs::write(&path, "[project]\ndir = \"work/oryol-samples\"\n").unwrap();

        let config = load_config(&path).unwrap().into_deploy_config();

        assert_eq!(config.project_dir, PathBuf::from("work/oryol-samples"));
        assert_eq!(
            config.deploy_dir,
            PathBuf::from("work/oryol-samples/../fips-deploy/oryol-samples-webpage")
        );
        assert_eq!(
            config.build_output_dir,
            PathBuf::from("work/oryol-samples/../fips-deploy/oryol-samples")
        );
    }

    #[test]
    fn explicit_deploy_dir_wins_over_project_dir() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("samplepage.toml");
        fs::write(&path, "[project]\ndir = \"proj\"\n\n[deploy]\ndir = \"out\"\n").unwrap();

        let config = load_config(&path).unwrap().into_deploy_config();

        assert_eq!(config.deploy_dir, PathBuf::from("out"));
        assert_eq!(config.build_output_dir, PathBuf::from("proj/../fips-deploy/oryol-samples"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("samplepage.toml");
        fs::write(&path, "[targets]\nasmjs = \"maybe\"\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}
