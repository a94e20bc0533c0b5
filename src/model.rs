use serde::{Deserialize, Serialize};

pub const ICON_INSTALL: &str = "Images/install.png";
pub const ICON_ERROR: &str = "Images/error.png";
pub const ICON_PLUGIN: &str = "Images/choco.png";

/// One package as reported by the package manager's `--limit-output` mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
}

/// Optional metadata from a per-package info lookup. Empty strings mean "not reported".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDetails {
    pub description: String,
    pub downloads: String,
    pub tags: String,
}

/// Follow-up call the host makes when the user activates a result.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub method: String,
    pub parameters: Vec<String>,
    #[serde(rename = "dontHideAfterAction", default)]
    pub keep_open: bool,
}

impl Action {
    pub fn new(method: &str, parameter: &str) -> Self {
        Self {
            method: method.to_string(),
            parameters: vec![parameter.to_string()],
            keep_open: false,
        }
    }
}

/// A row rendered by the launcher host. Field names follow the host's wire format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "SubTitle")]
    pub subtitle: String,
    #[serde(rename = "IcoPath")]
    pub icon_path: String,
    #[serde(rename = "JsonRPCAction", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl ResultEntry {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, icon_path: &str) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            icon_path: icon_path.to_string(),
            action: None,
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }
}
