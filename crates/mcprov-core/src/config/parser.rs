//! Config parser with helpful error messages

use super::schema::ProvisionConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// On-disk config formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Parse a config file, picking the format from its extension
pub fn parse_config_file(path: &Path) -> Result<ProvisionConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content, ConfigFormat::from_path(path))
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse config content from string
pub fn parse_config_str(content: &str, format: ConfigFormat) -> Result<ProvisionConfig> {
    let config: ProvisionConfig = match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?,
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
            let context = get_line_context(content, e.line());
            anyhow::anyhow!(
                "JSON parsing error at line {}:\n{}\n\nError: {}",
                e.line(),
                context,
                e
            )
        })?,
    };

    config.validate()?;

    Ok(config)
}

/// Enhance TOML parsing errors with helpful context
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let error_msg = error.to_string();

    let line_hint = error.span().map(|span| {
        content[..span.start.min(content.len())]
            .bytes()
            .filter(|b| *b == b'\n')
            .count()
            + 1
    });

    if let Some(line_num) = line_hint {
        let context = get_line_context(content, line_num);
        anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            context,
            error_msg
        )
    } else {
        anyhow::anyhow!("TOML parsing error: {}", error_msg)
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2).min(lines.len());
    let end = (line_num + 2).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize a configuration to TOML string
pub fn to_toml(config: &ProvisionConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config to TOML")
}
