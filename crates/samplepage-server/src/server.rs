//! Browser and file server launch.

use std::path::PathBuf;
use std::process::ExitStatus;

use tokio::process::Command;

/// Port the local file server listens on.
pub const SERVE_PORT: u16 = 8000;

/// Host platforms with a known launch command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Osx,
    Windows,
    Linux,
}

impl HostPlatform {
    /// The platform this binary was compiled for.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            HostPlatform::Osx
        } else if cfg!(windows) {
            HostPlatform::Windows
        } else {
            HostPlatform::Linux
        }
    }
}

/// How to open a browser and start the file server on one platform.
#[derive(Debug, PartialEq, Eq)]
pub struct Launcher {
    pub platform: HostPlatform,

    /// Command that opens a URL in the default browser
    pub open: &'static str,

    /// Shell separator between the browser and server commands
    pub separator: &'static str,

    /// File server command; the port is appended
    pub server: &'static str,
}

static LAUNCHERS: [Launcher; 3] = [
    Launcher {
        platform: HostPlatform::Osx,
        open: "open",
        separator: " ; ",
        server: "python3 -m http.server",
    },
    Launcher {
        platform: HostPlatform::Windows,
        open: "cmd /c start",
        separator: " && ",
        server: "python -m http.server",
    },
    Launcher {
        platform: HostPlatform::Linux,
        open: "xdg-open",
        separator: "; ",
        server: "python3 -m http.server",
    },
];

impl Launcher {
    pub fn for_platform(platform: HostPlatform) -> &'static Launcher {
        LAUNCHERS
            .iter()
            .find(|l| l.platform == platform)
            .unwrap_or(&LAUNCHERS[LAUNCHERS.len() - 1])
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}", SERVE_PORT)
    }

    /// Combined shell command: open the browser, then run the server.
    pub fn command_line(&self) -> String {
        format!(
            "{} {}{}{} {}",
            self.open,
            self.url(),
            self.separator,
            self.server,
            SERVE_PORT
        )
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Directory not found: {0}. Run 'samplepage build' first.")]
    DirectoryNotFound(String),

    #[error("Failed to launch `{command}`: {message}")]
    SpawnError { command: String, message: String },

    #[error("Failed waiting for server: {0}")]
    WaitError(String),
}

/// Serves a deploy directory through the platform's launch command.
pub struct PageServer {
    dir: PathBuf,
    command_line: String,
}

impl PageServer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            command_line: Launcher::for_platform(HostPlatform::detect()).command_line(),
        }
    }

    /// Replace the launch command line.
    pub fn with_command_line(mut self, command_line: impl Into<String>) -> Self {
        self.command_line = command_line.into();
        self
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Run the launch command in the deploy directory until it exits.
    ///
    /// Ctrl-C stops the server and counts as a normal exit.
    pub async fn run(&self) -> Result<(), ServerError> {
        if !self.dir.is_dir() {
            return Err(ServerError::DirectoryNotFound(self.dir.display().to_string()));
        }

        tracing::info!("Serving {} at http://localhost:{}", self.dir.display(), SERVE_PORT);
        tracing::debug!("Running `{}`", self.command_line);

        let mut child = shell(&self.command_line)
            .current_dir(&self.dir)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ServerError::SpawnError {
                command: self.command_line.clone(),
                message: e.to_string(),
            })?;

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| ServerError::WaitError(e.to_string()))?;
                report_exit(status);
            }
            Ok(()) = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping server");
                let _ = child.kill().await;
            }
        }

        Ok(())
    }
}

fn shell(command_line: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command_line]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command_line]);
        cmd
    }
}

fn report_exit(status: ExitStatus) {
    if status.success() {
        tracing::info!("Server stopped");
    } else {
        tracing::warn!("Server exited with {}", status);
    }
}
