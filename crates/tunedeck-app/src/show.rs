use anyhow::{Context, Result};
use serde_json::Value;
use tunedeck_core::record::with_defaults;

use crate::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Stored,
    Default,
}

impl ValueSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
    pub source: ValueSource,
}

pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl<'a> App<'a> {
    /// Flattened settings with defaults filled, marking which values came from storage.
    pub fn settings_rows(&self) -> Result<Vec<SettingRow>> {
        let stored = self
            .settings
            .load()
            .context("failed to load settings record")?;

        let rows = with_defaults(&stored)
            .flatten()
            .into_iter()
            .map(|(key, value)| {
                let source = if stored.get(&key).is_some() {
                    ValueSource::Stored
                } else {
                    ValueSource::Default
                };
                SettingRow {
                    value: render_value(&value),
                    key,
                    source,
                }
            })
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_value;

    #[test]
    fn strings_render_without_quotes() {
        assert_eq!(render_value(&json!("artist")), "artist");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&json!([1, 2])), "[1,2]");
    }
}
