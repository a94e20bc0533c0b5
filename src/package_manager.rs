use std::sync::OnceLock;
use regex::Regex;
use crate::error::{Error, Result};
use crate::executor::ShellKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageAction {
    Install,
    Uninstall,
    Upgrade,
}

impl PackageAction {
    pub fn subcommand(self) -> &'static str {
        match self {
            PackageAction::Install => "install",
            PackageAction::Uninstall => "uninstall",
            PackageAction::Upgrade => "upgrade",
        }
    }

    /// Used in "Starting <noun> of <name>".
    pub fn noun(self) -> &'static str {
        match self {
            PackageAction::Install => "installation",
            PackageAction::Uninstall => "uninstallation",
            PackageAction::Upgrade => "upgrade",
        }
    }

    /// Used in "Error <gerund> <name>: ...".
    pub fn gerund(self) -> &'static str {
        match self {
            PackageAction::Install => "installing",
            PackageAction::Uninstall => "uninstalling",
            PackageAction::Upgrade => "upgrading",
        }
    }

    /// Install and uninstall re-list installed packages afterwards; upgrade does not.
    pub fn refreshes_cache(self) -> bool {
        !matches!(self, PackageAction::Upgrade)
    }
}

/// Builds command lines for the package-manager CLI.
#[derive(Debug, Clone)]
pub struct PackageManager {
    program: String,
    shell: ShellKind,
}

impl PackageManager {
    pub fn new(program: &str, shell: ShellKind) -> Self {
        Self {
            program: program.to_string(),
            shell,
        }
    }

    fn invoke(&self, args: &str) -> String {
        format!("{}{} {}", self.shell.call_prefix(), self.program, args)
    }

    pub fn list_installed(&self) -> String {
        self.invoke("list --limit-output --local-only")
    }

    pub fn search(&self, query: &str) -> String {
        let terms: Vec<String> = query
            .split_whitespace()
            .map(|term| self.shell.quote(term))
            .collect();
        self.invoke(&format!("search {} --limit-output", terms.join(" ")))
    }

    pub fn info(&self, name: &str) -> String {
        self.invoke(&format!("info {} --limit-output", self.shell.quote(name)))
    }

    /// Elevated, auto-confirmed command line for `action`. `name` must already be validated.
    pub fn action(&self, action: PackageAction, name: &str) -> String {
        let inner = format!("{} {} {} -y", self.program, action.subcommand(), name);
        self.shell.elevate(&inner)
    }
}

fn package_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._+-]*$").expect("package name pattern is valid")
    })
}

pub fn validate_package_name(name: &str) -> Result<&str> {
    if package_name_pattern().is_match(name) {
        Ok(name)
    } else {
        Err(Error::InvalidPackageName(name.to_string()))
    }
}
