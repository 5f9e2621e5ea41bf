//! Message preview configuration model and its storage-safe serialized form.
//!
//! [`MessageConfig`] is what the editor mutates; [`SerializedMessageConfig`] is the JSON wire
//! shape written to storage and shown in the JSON editing pane. The only representational
//! difference is `time`, which is a UTC timestamp in memory and an ISO-8601 string on the wire.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Preview color theme.
pub enum Theme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A user, channel, or user group the preview can resolve mentions against.
pub struct DirectoryEntry {
    /// Workspace identifier, for example `U1TEST`.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl DirectoryEntry {
    /// Creates an entry from an id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Mention directories available to the preview.
pub struct ConfigData {
    /// Users, in display order.
    #[serde(default)]
    pub users: Vec<DirectoryEntry>,
    /// Channels, in display order.
    #[serde(default)]
    pub channels: Vec<DirectoryEntry>,
    /// User groups, in display order.
    #[serde(default)]
    pub user_groups: Vec<DirectoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// In-memory preview configuration.
pub struct MessageConfig {
    /// Avatar URL; empty means no logo.
    pub logo: String,
    /// Sender display name.
    pub name: String,
    /// Message timestamp; `None` hides it.
    pub time: Option<DateTime<Utc>>,
    /// Shows the block debug overlay.
    pub show_block_kit_debug: bool,
    /// Preview theme override.
    pub theme: Option<Theme>,
    /// Renders without default styles.
    pub unstyled: bool,
    /// Renders blocks without the message wrapper.
    pub without_wrapper: bool,
    /// Resolves user mentions through `data` instead of raw ids.
    pub enable_custom_user_hook: bool,
    /// Mention directories.
    pub data: Option<ConfigData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// JSON wire form of [`MessageConfig`].
pub struct SerializedMessageConfig {
    /// Avatar URL; empty means no logo.
    pub logo: String,
    /// Sender display name.
    pub name: String,
    /// ISO-8601 timestamp or `null`.
    pub time: Option<String>,
    /// Shows the block debug overlay.
    pub show_block_kit_debug: bool,
    /// Preview theme override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    /// Renders without default styles.
    pub unstyled: bool,
    /// Renders blocks without the message wrapper.
    pub without_wrapper: bool,
    /// Resolves user mentions through `data` instead of raw ids.
    pub enable_custom_user_hook: bool,
    /// Mention directories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ConfigData>,
}

/// Formats a timestamp the way browsers render `Date.toISOString()`.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Local date-time layouts accepted when no offset is given; read as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses an ISO-8601 timestamp.
///
/// Accepts RFC 3339 including signed years outside `0000..=9999`, date-times without seconds or
/// offset (read as UTC), and a bare `YYYY-MM-DD` date meaning midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = raw.parse::<DateTime<FixedOffset>>() {
        return Some(parsed.with_timezone(&Utc));
    }
    let local = raw
        .strip_suffix('Z')
        .or_else(|| raw.strip_suffix('z'))
        .unwrap_or(raw);
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(local, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Converts a configuration into its storage-safe form.
pub fn serialize_config(config: &MessageConfig) -> SerializedMessageConfig {
    SerializedMessageConfig {
        logo: config.logo.clone(),
        name: config.name.clone(),
        time: config.time.as_ref().map(format_timestamp),
        show_block_kit_debug: config.show_block_kit_debug,
        theme: config.theme,
        unstyled: config.unstyled,
        without_wrapper: config.without_wrapper,
        enable_custom_user_hook: config.enable_custom_user_hook,
        data: config.data.clone(),
    }
}

/// Converts a serialized configuration back into its in-memory form.
///
/// A `time` string that does not parse becomes `None`.
pub fn deserialize_config(serialized: SerializedMessageConfig) -> MessageConfig {
    MessageConfig {
        logo: serialized.logo,
        name: serialized.name,
        time: serialized.time.as_deref().and_then(parse_timestamp),
        show_block_kit_debug: serialized.show_block_kit_debug,
        theme: serialized.theme,
        unstyled: serialized.unstyled,
        without_wrapper: serialized.without_wrapper,
        enable_custom_user_hook: serialized.enable_custom_user_hook,
        data: serialized.data,
    }
}

/// Renders the serialized form as two-space indented JSON.
///
/// # Errors
///
/// Returns an error when JSON encoding fails.
pub fn config_to_pretty_json(config: &MessageConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serialize_config(config))
}

/// Built-in configuration used when nothing is persisted.
pub fn default_config() -> MessageConfig {
    MessageConfig {
        logo: "https://a.slack-edge.com/80588/marketing/img/meta/slack_hash_256.png".to_string(),
        name: "Acme Bot".to_string(),
        time: Some(playground_host::current_timestamp()),
        show_block_kit_debug: true,
        theme: None,
        unstyled: false,
        without_wrapper: false,
        enable_custom_user_hook: true,
        data: Some(ConfigData {
            users: vec![
                DirectoryEntry::new("U1TEST", "Amanda"),
                DirectoryEntry::new("U2TEST", "Harry"),
                DirectoryEntry::new("U3TEST", "John"),
                DirectoryEntry::new("U4TEST", "Mash Codee"),
                DirectoryEntry::new("U5TEST", "Jake"),
            ],
            channels: vec![
                DirectoryEntry::new("C1TEST", "general"),
                DirectoryEntry::new("C2TEST", "leadership-feedback"),
            ],
            user_groups: vec![DirectoryEntry::new("SAZ94GDB8", "My User Group")],
        }),
    }
}
