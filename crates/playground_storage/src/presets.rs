//! Built-in configuration presets offered by the configuration editor.

use crate::config::{default_config, ConfigData, DirectoryEntry, MessageConfig};

/// Identifier of the preset that "reset to defaults" restores.
pub const DEFAULT_PRESET_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Named, ready-to-apply configuration.
pub struct ConfigPreset {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Configuration applied when the preset is selected.
    pub config: MessageConfig,
}

fn entries(pairs: &[(&str, &str)]) -> Vec<DirectoryEntry> {
    pairs
        .iter()
        .map(|(id, name)| DirectoryEntry::new(*id, *name))
        .collect()
}

fn bot(logo: &str, name: &str, show_block_kit_debug: bool, data: ConfigData) -> MessageConfig {
    MessageConfig {
        logo: logo.to_string(),
        name: name.to_string(),
        show_block_kit_debug,
        enable_custom_user_hook: false,
        data: Some(data),
        ..default_config()
    }
}

/// Returns the preset catalog in display order.
///
/// Presets carrying a timestamp are stamped with the current time.
pub fn config_presets() -> Vec<ConfigPreset> {
    vec![
        ConfigPreset {
            id: DEFAULT_PRESET_ID,
            name: "Default (Acme Bot)",
            description: "The default playground configuration",
            config: default_config(),
        },
        ConfigPreset {
            id: "github",
            name: "GitHub Bot",
            description: "Configuration for a GitHub notification bot",
            config: bot(
                "https://github.githubassets.com/images/modules/logos_page/GitHub-Mark.png",
                "GitHub Bot",
                true,
                ConfigData {
                    users: entries(&[("U1DEV", "alice"), ("U2DEV", "bob"), ("U3DEV", "charlie")]),
                    channels: entries(&[
                        ("C1GITHUB", "github-notifications"),
                        ("C2DEV", "dev-team"),
                    ]),
                    user_groups: entries(&[("SDEV001", "developers")]),
                },
            ),
        },
        ConfigPreset {
            id: "support",
            name: "Support Bot",
            description: "Configuration for a customer support bot",
            config: bot(
                "https://cdn-icons-png.flaticon.com/512/3239/3239952.png",
                "Support Assistant",
                false,
                ConfigData {
                    users: entries(&[("U1SUP", "sarah"), ("U2SUP", "mike"), ("U3SUP", "emma")]),
                    channels: entries(&[
                        ("C1SUPPORT", "customer-support"),
                        ("C2URGENT", "urgent-tickets"),
                    ]),
                    user_groups: entries(&[("SSUPPORT", "support-team")]),
                },
            ),
        },
        ConfigPreset {
            id: "alert",
            name: "Alert Bot",
            description: "Configuration for system alerts and monitoring",
            config: bot(
                "https://cdn-icons-png.flaticon.com/512/2913/2913133.png",
                "Alert System",
                false,
                ConfigData {
                    users: entries(&[
                        ("U1OPS", "ops-lead"),
                        ("U2OPS", "devops-1"),
                        ("U3OPS", "devops-2"),
                    ]),
                    channels: entries(&[
                        ("C1ALERTS", "alerts"),
                        ("C2INCIDENTS", "incidents"),
                        ("C3MONITORING", "monitoring"),
                    ]),
                    user_groups: entries(&[("SONCALL", "on-call"), ("SDEVOPS", "devops")]),
                },
            ),
        },
        ConfigPreset {
            id: "minimal",
            name: "Minimal",
            description: "Minimal configuration without wrapper",
            config: MessageConfig {
                logo: String::new(),
                name: String::new(),
                time: None,
                show_block_kit_debug: false,
                theme: None,
                unstyled: false,
                without_wrapper: true,
                enable_custom_user_hook: false,
                data: Some(ConfigData::default()),
            },
        },
    ]
}

/// Looks up a preset by id.
pub fn find_preset(id: &str) -> Option<ConfigPreset> {
    config_presets().into_iter().find(|preset| preset.id == id)
}
