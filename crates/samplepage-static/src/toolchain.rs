//! External build driver and web toolchain detection.

use std::path::PathBuf;
use std::process::Command;

use crate::builder::{DeployConfig, DeployError};
use crate::target::Target;

/// The external project generator/builder.
///
/// Both calls block until the external tool finishes and fail on the first
/// error; the caller does not retry.
pub trait BuildDriver {
    /// Generate project files for a build configuration.
    fn generate(&self, config: &str) -> Result<(), DeployError>;

    /// Build a previously generated configuration.
    fn build(&self, config: &str) -> Result<(), DeployError>;
}

/// Whether the web toolchain is installed.
pub trait Toolchain {
    fn is_available(&self) -> bool;
}

/// Runs `<program> gen <config>` and `<program> build <config>`.
#[derive(Debug, Clone)]
pub struct CommandDriver {
    program: PathBuf,
    project_dir: PathBuf,
}

impl CommandDriver {
    pub fn new(program: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            project_dir: project_dir.into(),
        }
    }

    fn run(&self, verb: &str, config: &str) -> Result<(), DeployError> {
        tracing::info!("> {} {} {}", self.program.display(), verb, config);

        let status = Command::new(&self.program)
            .args([verb, config])
            .current_dir(&self.project_dir)
            .status()
            .map_err(|e| DeployError::DriverError {
                config: config.to_string(),
                message: format!("failed to run {}: {}", self.program.display(), e),
            })?;

        if !status.success() {
            return Err(DeployError::DriverError {
                config: config.to_string(),
                message: format!("`{} {}` exited with {}", self.program.display(), verb, status),
            });
        }

        Ok(())
    }
}

impl BuildDriver for CommandDriver {
    fn generate(&self, config: &str) -> Result<(), DeployError> {
        self.run("gen", config)
    }

    fn build(&self, config: &str) -> Result<(), DeployError> {
        self.run("build", config)
    }
}

/// Emscripten detection: an explicit SDK directory if configured, otherwise
/// `emcc` on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct EmscriptenToolchain {
    sdk_dir: Option<PathBuf>,
}

impl EmscriptenToolchain {
    pub fn new(sdk_dir: Option<PathBuf>) -> Self {
        Self { sdk_dir }
    }
}

impl Toolchain for EmscriptenToolchain {
    fn is_available(&self) -> bool {
        match &self.sdk_dir {
            Some(dir) => dir.is_dir(),
            None => which::which("emcc").is_ok(),
        }
    }
}

/// Generates and builds every enabled web target.
pub struct BuildOrchestrator<'a> {
    driver: &'a dyn BuildDriver,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(driver: &'a dyn BuildDriver) -> Self {
        Self { driver }
    }

    /// Build the targets enabled in `config`, returning those that were built.
    ///
    /// Nothing is built when the toolchain is unavailable.
    pub fn build_targets(
        &self,
        config: &DeployConfig,
        toolchain_available: bool,
    ) -> Result<Vec<Target>, DeployError> {
        if !toolchain_available {
            return Ok(Vec::new());
        }

        let mut built = Vec::new();
        for target in Target::ALL {
            if !config.target_enabled(target) {
                continue;
            }
            let build_config = config.build_config(target);
            self.driver.generate(build_config)?;
            self.driver.build(build_config)?;
            built.push(target);
        }

        Ok(built)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingDriver {
        calls: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingDriver {
        fn record(&self, call: String) -> Result<(), DeployError> {
            let fail = self.fail_on.is_some_and(|f| f == call);
            self.calls.lock().unwrap().push(call);
            if fail {
                return Err(DeployError::DriverError {
                    config: "test".to_string(),
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    impl BuildDriver for RecordingDriver {
        fn generate(&self, config: &str) -> Result<(), DeployError> {
            self.record(format!("gen {config}"))
        }

        fn build(&self, config: &str) -> Result<(), DeployError> {
            self.record(format!("build {config}"))
        }
    }

    #[test]
    fn builds_enabled_targets_in_order() {
        let driver = RecordingDriver::default();
        let config = DeployConfig::default();

        let built = BuildOrchestrator::new(&driver)
            .build_targets(&config, true)
            .unwrap();

        assert_eq!(built, vec![Target::AsmJs, Target::Wasm]);
        assert_eq!(
            *driver.calls.lock().unwrap(),
            vec![
                "gen webgl2-emsc-ninja-release",
                "build webgl2-emsc-ninja-release",
                "gen webgl2-wasm-ninja-release",
                "build webgl2-wasm-ninja-release",
            ]
        );
    }

    #[test]
    fn skips_disabled_targets() {
        let driver = RecordingDriver::default();
        let config = DeployConfig {
            build_asmjs: false,
            ..Default::default()
        };

        let built = BuildOrchestrator::new(&driver)
            .build_targets(&config, true)
            .unwrap();

        assert_eq!(built, vec![Target::Wasm]);
        assert_eq!(driver.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn builds_nothing_without_toolchain() {
        let driver = RecordingDriver::default();

        let built = BuildOrchestrator::new(&driver)
            .build_targets(&DeployConfig::default(), false)
            .unwrap();

        assert!(built.is_empty());
        assert!(driver.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn first_failure_aborts() {
        let driver = RecordingDriver {
            fail_on: Some("gen webgl2-emsc-ninja-release"),
            ..Default::default()
        };

        let result = BuildOrchestrator::new(&driver).build_targets(&DeployConfig::default(), true);

        assert!(matches!(result, Err(DeployError::DriverError { .. })));
        assert_eq!(driver.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn sdk_dir_decides_availability() {
        let temp = tempdir().unwrap();

        assert!(EmscriptenToolchain::new(Some(temp.path().to_path_buf())).is_available());
        assert!(!EmscriptenToolchain::new(Some(temp.path().join("missing"))).is_available());
    }

    #[cfg(unix)]
    #[test]
    fn command_driver_reports_exit_status() {
        let temp = tempdir().unwrap();

        assert!(CommandDriver::new("true", temp.path()).generate("cfg").is_ok());

        let result = CommandDriver::new("false", temp.path()).build("cfg");
        assert!(matches!(result, Err(DeployError::DriverError { config, .. }) if config == "cfg"));
    }

    #[test]
    fn command_driver_reports_spawn_failure() {
        let temp = tempdir().unwrap();

        let result = CommandDriver::new(temp.path().join("no-such-driver"), temp.path()).generate("cfg");

        assert!(matches!(result, Err(DeployError::DriverError { .. })));
    }
}
