use std::process::{Command, Stdio};
use serde::Deserialize;
use log::{debug, error};
use crate::error::{Error, Result};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;
#[cfg(windows)]
const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;

/// Interpreter used to run package-manager command lines.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShellKind {
    PowerShell,
    Posix,
}

impl Default for ShellKind {
    fn default() -> Self {
        if cfg!(windows) { ShellKind::PowerShell } else { ShellKind::Posix }
    }
}

impl ShellKind {
    pub fn program(self) -> &'static str {
        match self {
            ShellKind::PowerShell => "powershell",
            ShellKind::Posix => "sh",
        }
    }

    fn args(self, command: &str) -> Vec<String> {
        match self {
            ShellKind::PowerShell => vec!["-NoProfile".into(), "-Command".into(), command.into()],
            ShellKind::Posix => vec!["-c".into(), command.into()],
        }
    }

    /// Prefix needed to invoke an external program by name.
    pub fn call_prefix(self) -> &'static str {
        match self {
            ShellKind::PowerShell => "& ",
            ShellKind::Posix => "",
        }
    }

    /// Single-quotes `arg` so the shell passes it through as one literal word.
    pub fn quote(self, arg: &str) -> String {
        match self {
            ShellKind::PowerShell => format!("'{}'", arg.replace('\'', "''")),
            ShellKind::Posix => format!("'{}'", arg.replace('\'', r"'\''")),
        }
    }

    /// Wraps `command` so it runs with administrator rights in its own window.
    pub fn elevate(self, command: &str) -> String {
        match self {
            ShellKind::PowerShell => format!(
                "Start-Process powershell -Verb RunAs -ArgumentList '-Command \"{}\"'",
                command.replace('\'', "''")
            ),
            ShellKind::Posix => format!("pkexec sh -c {}", self.quote(command)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn launch_failure(message: String) -> Self {
        Self {
            stdout: String::new(),
            stderr: message,
            exit_code: 1,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stderr, or stdout when the tool reported its failure there.
    pub fn diagnostic(&self) -> &str {
        if self.stderr.is_empty() { &self.stdout } else { &self.stderr }
    }
}

pub trait CommandRunner: Sync {
    /// Runs `command` to completion. Never fails: launch errors come back as a
    /// non-zero exit with the error text on stderr.
    fn run(&self, command: &str) -> CommandOutput;

    /// Starts `command` detached and returns immediately.
    fn spawn_detached(&self, command: &str) -> Result<()>;
}

pub struct ShellRunner {
    shell: ShellKind,
    program: String,
}

impl ShellRunner {
    pub fn new(shell: ShellKind) -> Self {
        Self {
            shell,
            program: shell.program().to_string(),
        }
    }

    fn command(&self, line: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.shell.args(line)).stdin(Stdio::null());
        command
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, line: &str) -> CommandOutput {
        debug!("Running `{}`", line);
        let mut command = self.command(line);
        hide_window(&mut command);

        match command.output() {
            Ok(output) => CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                exit_code: output.status.code().unwrap_or(-1),
            },
            Err(e) => {
                error!("Error running command `{}`: {}", line, e);
                CommandOutput::launch_failure(e.to_string())
            }
        }
    }

    fn spawn_detached(&self, line: &str) -> Result<()> {
        debug!("Spawning `{}`", line);
        let mut command = self.command(line);
        command.stdout(Stdio::null()).stderr(Stdio::null());
        detach(&mut command);

        command.spawn().map_err(|source| Error::Spawn {
            command: line.to_string(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(windows)]
fn hide_window(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_window(_command: &mut Command) {}

#[cfg(windows)]
fn detach(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    command.creation_flags(CREATE_NEW_CONSOLE);
}

#[cfg(unix)]
fn detach(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    // New session: the child keeps running after the plugin process exits.
    unsafe {
        command.pre_exec(|| {
            nix::unistd::setsid().map(|_| ()).map_err(std::io::Error::from)
        });
    }
}

#[cfg(not(any(unix, windows)))]
fn detach(_command: &mut Command) {}
