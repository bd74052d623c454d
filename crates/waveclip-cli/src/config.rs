//! Render configuration (TOML) and parameter parsing.
//!
//! ```toml
//! block_size = 256
//!
//! [params]
//! drive = 1.5
//! mode = "soft"
//!
//! [[automation]]
//! frame = 48000
//! param = "drive"
//! value = 4.0
//! ```

use crate::error::CliError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use waveclip_core::{ParamChange, ParamDescriptor, ParameterStore, ShapeMode, params};

/// Block size used when neither the command line nor the config sets one.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// A parameter value as written in TOML: a number, or a mode name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Numeric value in the parameter's automation range.
    Number(f64),
    /// Symbolic value (mode names).
    Name(String),
}

/// One automation point at an absolute frame of the input file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AutomationPoint {
    /// Absolute frame index.
    pub frame: u64,
    /// Parameter key (`drive`, `mix`, `mode`).
    pub param: String,
    /// New value.
    pub value: ParamValue,
}

/// Offline render configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Processing block size.
    #[serde(default)]
    pub block_size: Option<usize>,
    /// Initial parameter values by key.
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
    /// Automation points, in any order.
    #[serde(default)]
    pub automation: Vec<AutomationPoint>,
}

impl RenderConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration text.
    pub fn parse(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply the `[params]` table to a store.
    pub fn apply_params(&self, store: &mut ParameterStore) -> Result<(), CliError> {
        for (key, value) in &self.params {
            let change = resolve(key, value)?;
            store.apply(change);
        }
        Ok(())
    }

    /// Resolve automation into `(frame, change)` pairs sorted by frame.
    ///
    /// Points sharing a frame keep their file order.
    pub fn automation_events(&self) -> Result<Vec<(u64, ParamChange)>, CliError> {
        let mut events = self
            .automation
            .iter()
            .map(|point| Ok((point.frame, resolve(&point.param, &point.value)?)))
            .collect::<Result<Vec<_>, CliError>>()?;
        events.sort_by_key(|(frame, _)| *frame);
        Ok(events)
    }
}

fn lookup(key: &str) -> Result<&'static ParamDescriptor, CliError> {
    params::descriptor_by_key(key).ok_or_else(|| CliError::UnknownParam(key.to_string()))
}

/// Resolve a key and a TOML value into a parameter change.
pub fn resolve(key: &str, value: &ParamValue) -> Result<ParamChange, CliError> {
    let desc = lookup(key)?;
    let invalid = |text: &str| CliError::InvalidValue {
        param: key.to_string(),
        value: text.to_string(),
    };

    let number = match value {
        ParamValue::Number(n) if n.is_finite() => *n,
        ParamValue::Number(n) => return Err(invalid(&n.to_string())),
        ParamValue::Name(name) if desc.id == params::MODE_ID => {
            f64::from(mode_by_name(name).ok_or_else(|| invalid(name))?.index())
        }
        ParamValue::Name(name) => return Err(invalid(name)),
    };

    Ok(ParamChange { id: desc.id, value: number })
}

/// Parse a command-line `key=value` override.
///
/// Values are numbers, or mode names for `mode`.
pub fn parse_override(key: &str, text: &str) -> Result<ParamChange, CliError> {
    let text = text.trim();
    let value = match text.parse::<f64>() {
        Ok(n) => ParamValue::Number(n),
        Err(_) => ParamValue::Name(text.to_string()),
    };
    resolve(key, &value)
}

/// Mode by short name (`hard`, `soft`, `fold`) or full label.
pub fn mode_by_name(name: &str) -> Option<ShapeMode> {
    let name = name.trim();
    ShapeMode::ALL.into_iter().find(|mode| {
        let short = match mode {
            ShapeMode::Hard => "hard",
            ShapeMode::Soft => "soft",
            ShapeMode::Fold => "fold",
        };
        name.eq_ignore_ascii_case(short) || name.eq_ignore_ascii_case(mode.label())
    })
}
