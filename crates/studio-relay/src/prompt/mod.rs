//! System prompt construction
//!
//! Renders the studio's company-context template and, when the caller
//! supplied a live-statistics mapping, one line per game.

mod template;

pub use template::{DEFAULT_STUDIO_TEMPLATE, LIVE_STATS_HEADER, LIVE_STATS_MARKER};

use serde_json::{Map, Value};

use crate::config::StudioConfig;
use crate::error::{Result, StudioError};

/// Builds the synthesized system message for each chat request
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
    placeholder: String,
}

impl PromptBuilder {
    /// Create a builder around a template and a missing-field placeholder
    pub fn new(template: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            placeholder: placeholder.into(),
        }
    }

    /// Build from studio configuration, reading `template_path` when set
    pub fn from_config(config: &StudioConfig) -> Result<Self> {
        let template = match &config.template_path {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                StudioError::Config(format!(
                    "Failed to read prompt template {}: {}",
                    path.display(),
                    e
                ))
            })?,
            None => DEFAULT_STUDIO_TEMPLATE.to_string(),
        };

        Ok(Self::new(template, config.stats_placeholder.clone()))
    }

    /// Render the system prompt
    ///
    /// Anything other than a JSON object for `live_stats` renders exactly as
    /// if no stats were supplied. Never fails.
    pub fn build(&self, live_stats: Option<&Value>) -> String {
        let block = match live_stats {
            Some(Value::Object(entries)) => render_stats_block(entries, &self.placeholder),
            _ => String::new(),
        };

        if self.template.contains(LIVE_STATS_MARKER) {
            self.template.replace(LIVE_STATS_MARKER, &block)
        } else {
            let mut prompt = self.template.clone();
            prompt.push_str(&block);
            prompt
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_STUDIO_TEMPLATE, "N/A")
    }
}

/// Render the stats block, entries in caller order
pub fn render_stats_block(entries: &Map<String, Value>, placeholder: &str) -> String {
    let mut block = format!("\n\n{LIVE_STATS_HEADER}\n");
    for (game, data) in entries {
        block.push_str("• ");
        block.push_str(&single_line(game));
        block.push_str(": ");
        block.push_str(&render_entry(data, placeholder));
        block.push('\n');
    }
    block
}

fn render_entry(data: &Value, placeholder: &str) -> String {
    match data {
        Value::Object(record) => format!(
            "{} visits, {}",
            render_field(record.get("visits"), placeholder),
            render_field(record.get("playing"), placeholder)
        ),
        Value::Array(_) => format!("{placeholder} visits, {placeholder}"),
        scalar => render_field(Some(scalar), placeholder),
    }
}

/// Absent, null, blank or nested values degrade to the placeholder
fn render_field(value: Option<&Value>, placeholder: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => single_line(s),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => placeholder.to_string(),
    }
}

// Keeps one stats entry on one prompt line.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n']).collect::<Vec<_>>().join(" ")
}
