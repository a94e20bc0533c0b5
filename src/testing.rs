//! Test doubles for the process and host boundaries.

use std::sync::Mutex;
use crate::error::{Error, Result};
use crate::executor::{CommandOutput, CommandRunner};
use crate::host::Host;

type SpawnHook = Box<dyn Fn(&str) + Send + Sync>;

/// Answers `run` with scripted outputs, matched by substring in registration order.
pub struct FakeRunner {
    responses: Vec<(String, CommandOutput)>,
    calls: Mutex<Vec<String>>,
    spawned: Mutex<Vec<String>>,
    spawn_hook: Option<SpawnHook>,
    fail_spawn: bool,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            calls: Mutex::new(Vec::new()),
            spawned: Mutex::new(Vec::new()),
            spawn_hook: None,
            fail_spawn: false,
        }
    }

    pub fn on(self, fragment: &str, stdout: &str) -> Self {
        self.on_output(fragment, stdout, "", 0)
    }

    pub fn on_failure(self, fragment: &str, stderr: &str, exit_code: i32) -> Self {
        self.on_output(fragment, "", stderr, exit_code)
    }

    pub fn on_output(mut self, fragment: &str, stdout: &str, stderr: &str, exit_code: i32) -> Self {
        self.responses.push((
            fragment.to_string(),
            CommandOutput {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                exit_code,
            },
        ));
        self
    }

    pub fn on_spawn(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.spawn_hook = Some(Box::new(hook));
        self
    }

    pub fn failing_spawn(mut self) -> Self {
        self.fail_spawn = true;
        self
    }

    pub fn calls_matching(&self, fragment: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.contains(fragment)).count()
    }

    pub fn spawned(&self) -> Vec<String> {
        self.spawned.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &str) -> CommandOutput {
        self.calls.lock().unwrap().push(command.to_string());
        self.responses
            .iter()
            .find(|(fragment, _)| command.contains(fragment.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::launch_failure(format!("unexpected command: {command}")))
    }

    fn spawn_detached(&self, command: &str) -> Result<()> {
        if let Some(hook) = &self.spawn_hook {
            hook(command);
        }
        if self.fail_spawn {
            return Err(Error::Spawn {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied"),
            });
        }
        self.spawned.lock().unwrap().push(command.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingHost {
    pub messages: Vec<String>,
}

impl Host for RecordingHost {
    fn show_msg(&mut self, title: &str, _subtitle: &str) {
        self.messages.push(title.to_string());
    }
}
