//! Patch configuration from the command line and JSON patch files
//!
//! A patch file looks like:
//!
//! ```json
//! { "target": "C:\\file.exe", "offset": "0x1234", "payload": "AA BB CC" }
//! ```
//!
//! `offset` may also be a plain number and `payload` an array of byte values.
//! Values given on the command line override the file.

use crate::exceptions::ConfigError;
use crate::patch::PatchRequest;
use anyhow::Context;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Offset as written in a patch file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OffsetValue {
    Number(u64),
    Text(String),
}

/// Payload as written in a patch file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Hex(String),
    Bytes(Vec<u8>),
}

/// Contents of a JSON patch file; every field is optional so the command
/// line can fill the gaps
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchFile {
    #[serde(default)]
    pub target: Option<PathBuf>,
    #[serde(default)]
    pub offset: Option<OffsetValue>,
    #[serde(default)]
    pub payload: Option<PayloadValue>,
}

impl PatchFile {
    /// Read and parse a patch file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read patch file {}", path.display()))?;
        let file: PatchFile = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse patch file {}", path.display()))?;
        debug!("Loaded patch file {}: {:?}", path.display(), file);
        Ok(file)
    }
}

/// Settings gathered from every source, before validation
#[derive(Debug, Clone, Default)]
pub struct PatchConfig {
    pub target: Option<PathBuf>,
    pub offset: Option<String>,
    pub bytes: Option<String>,
    pub patch_file: Option<PathBuf>,
}

impl PatchConfig {
    /// Merge the patch file (if any) with command-line values and build the request
    pub fn resolve(&self) -> Result<PatchRequest, ConfigError> {
        let file = match &self.patch_file {
            Some(path) => PatchFile::load(path)?,
            None => PatchFile::default(),
        };
        self.resolve_with(file)
    }

    fn resolve_with(&self, file: PatchFile) -> Result<PatchRequest, ConfigError> {
        let target = self
            .target
            .clone()
            .or(file.target)
            .ok_or(ConfigError::MissingField("target"))?;

        let offset = match (&self.offset, file.offset) {
            (Some(text), _) => parse_offset(text)?,
            (None, Some(OffsetValue::Number(n))) => n,
            (None, Some(OffsetValue::Text(text))) => parse_offset(&text)?,
            (None, None) => return Err(ConfigError::MissingField("offset")),
        };

        let payload = match (&self.bytes, file.payload) {
            (Some(text), _) => parse_hex_bytes(text)?,
            (None, Some(PayloadValue::Hex(text))) => parse_hex_bytes(&text)?,
            (None, Some(PayloadValue::Bytes(bytes))) => bytes,
            (None, None) => return Err(ConfigError::MissingField("payload")),
        };

        PatchRequest::new(target, payload, offset)
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal offset; `_` separators are ignored
pub fn parse_offset(text: &str) -> Result<u64, ConfigError> {
    let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
    let parsed = if let Some(hex_digits) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        u64::from_str_radix(hex_digits, 16)
    } else {
        cleaned.parse::<u64>()
    };
    parsed.map_err(|e| ConfigError::InvalidOffset(format!("'{text}': {e}")))
}

/// Parse a hex byte string such as `AABBCC`, `AA BB CC`, `0xAA,0xBB` or `aa:bb:cc`
pub fn parse_hex_bytes(text: &str) -> Result<Vec<u8>, ConfigError> {
    let mut bytes = Vec::new();
    for token in text
        .split(|c: char| c.is_whitespace() || c == ',' || c == ':')
        .filter(|t| !t.is_empty())
    {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        let decoded = hex::decode(digits)
            .map_err(|e| ConfigError::InvalidPayload(format!("'{token}': {e}")))?;
        bytes.extend(decoded);
    }
    if bytes.is_empty() {
        return Err(ConfigError::EmptyPayload);
    }
    Ok(bytes)
}
