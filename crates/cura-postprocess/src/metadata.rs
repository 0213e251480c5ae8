use cura_postprocess_proto::handshake::v0 as handshake_pb;
use cura_postprocess_proto::plugins::SlotId;

pub const PLUGIN_NAME: &str = "CuraEngine plugin postprocess";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SLOT_VERSION: &str = "0.1.0-alpha.1";

/// Broadcast topic carrying the engine's global settings.
pub const SETTINGS_TOPIC: &str = "BroadcastSettings";

/// What the plugin tells the engine about itself during the handshake.
/// Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub plugin_name: String,
    pub plugin_version: String,
    pub slot_version: String,
    pub slot: SlotId,
    pub subscriptions: Vec<String>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self {
            plugin_name: PLUGIN_NAME.to_string(),
            plugin_version: PLUGIN_VERSION.to_string(),
            slot_version: SLOT_VERSION.to_string(),
            slot: SlotId::PostprocessModify,
            subscriptions: vec![SETTINGS_TOPIC.to_string()],
        }
    }

    pub fn to_response(&self) -> handshake_pb::CallResponse {
        handshake_pb::CallResponse {
            plugin_name: self.plugin_name.clone(),
            slot_version: self.slot_version.clone(),
            plugin_version: self.plugin_version.clone(),
            broadcast_subscriptions: self.subscriptions.clone(),
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::new()
    }
}

/// `--version` banner.
pub fn version_id() -> String {
    format!("{PLUGIN_NAME} {PLUGIN_VERSION}")
}
