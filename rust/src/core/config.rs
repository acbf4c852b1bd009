use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "announce_config.json";

const DEFAULT_CURRENCY_SUFFIX: &str = "€";
// Abbreviated date + short time, e.g. "Jan 3, 2023 at 4:05 PM".
const DEFAULT_DATE_FORMAT: &str = "%b %-d, %Y at %-I:%M %p";
const DEFAULT_PLACEHOLDER_IMAGE: &str = "camera";
const DEFAULT_INDICATOR_ACTIVE_SIZE: u32 = 10;
const DEFAULT_INDICATOR_INACTIVE_SIZE: u32 = 5;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) currency_suffix: Option<String>,
    pub(crate) date_format: Option<String>,
    pub(crate) placeholder_image: Option<String>,
    pub(crate) indicator_active_size: Option<u32>,
    pub(crate) indicator_inactive_size: Option<u32>,
}

/// Resolved presentation settings handed to every detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DisplayConfig {
    pub(crate) currency_suffix: String,
    pub(crate) date_format: String,
    pub(crate) placeholder_image: String,
    pub(crate) indicator_active_size: u32,
    pub(crate) indicator_inactive_size: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        AppConfig::default().display()
    }
}

pub(crate) fn load_app_config(data_dir: &str) -> AppConfig {
    let path = Path::new(data_dir).join(CONFIG_FILE_NAME);
    let Ok(bytes) = std::fs::read(&path) else {
        return AppConfig::default();
    };
    match serde_json::from_slice::<AppConfig>(&bytes) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(%e, path = %path.display(), "ignoring unreadable config");
            AppConfig::default()
        }
    }
}

pub(crate) fn default_app_config_json() -> String {
    let v = serde_json::json!({
        "currency_suffix": DEFAULT_CURRENCY_SUFFIX,
        "date_format": DEFAULT_DATE_FORMAT,
        "placeholder_image": DEFAULT_PLACEHOLDER_IMAGE,
        "indicator_active_size": DEFAULT_INDICATOR_ACTIVE_SIZE,
        "indicator_inactive_size": DEFAULT_INDICATOR_INACTIVE_SIZE,
    });
    serde_json::to_string_pretty(&v).unwrap_or_else(|_| "{}".to_string())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn is_valid_date_format(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

impl AppConfig {
    pub(crate) fn display(&self) -> DisplayConfig {
        let date_format = match non_empty(&self.date_format) {
            Some(fmt) if is_valid_date_format(fmt) => fmt.to_string(),
            Some(fmt) => {
                tracing::warn!(date_format = fmt, "invalid date_format, using default");
                DEFAULT_DATE_FORMAT.to_string()
            }
            None => DEFAULT_DATE_FORMAT.to_string(),
        };
        let indicator_active_size = self
            .indicator_active_size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_INDICATOR_ACTIVE_SIZE);
        let indicator_inactive_size = self
            .indicator_inactive_size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_INDICATOR_INACTIVE_SIZE);

        DisplayConfig {
            // Kept verbatim: a leading space is part of the suffix.
            currency_suffix: self
                .currency_suffix
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY_SUFFIX.to_string()),
            date_format,
            placeholder_image: non_empty(&self.placeholder_image)
                .unwrap_or(DEFAULT_PLACEHOLDER_IMAGE)
                .to_string(),
            indicator_active_size,
            indicator_inactive_size,
        }
    }
}
