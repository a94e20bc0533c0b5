//! JSON-RPC exchange with the launcher host: one request in, JSON lines out.

use std::io::{self, Write};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use log::error;
use crate::model::{ICON_PLUGIN, ResultEntry};

const SHOW_MSG: &str = "Flow.Launcher.ShowMsg";

/// Calls the plugin makes back into the launcher.
pub trait Host {
    fn show_msg(&mut self, title: &str, subtitle: &str);
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    #[serde(default)]
    pub parameters: Vec<Value>,
}

impl Request {
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw.trim())
    }

    /// Parameter `index` as text; non-string JSON values are rendered as JSON.
    pub fn param(&self, index: usize) -> Option<String> {
        match self.parameters.get(index)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct QueryResponse<'a> {
    result: &'a [ResultEntry],
}

#[derive(Serialize)]
struct HostCall<'a> {
    method: &'a str,
    parameters: [&'a str; 3],
}

pub fn write_results<W: Write>(mut out: W, entries: &[ResultEntry]) -> io::Result<()> {
    serde_json::to_writer(&mut out, &QueryResponse { result: entries })?;
    writeln!(out)?;
    out.flush()
}

/// Writes host calls as JSON lines to `out` (stdout in production).
pub struct JsonRpcHost<W: Write> {
    out: W,
}

impl<W: Write> JsonRpcHost<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn call(&mut self, call: &HostCall) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, call)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Host for JsonRpcHost<W> {
    fn show_msg(&mut self, title: &str, subtitle: &str) {
        let call = HostCall {
            method: SHOW_MSG,
            parameters: [title, subtitle, ICON_PLUGIN],
        };
        if let Err(e) = self.call(&call) {
            error!("Error sending message to host: {}", e);
        }
    }
}
