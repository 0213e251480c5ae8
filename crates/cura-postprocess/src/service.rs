use crate::identity::connection_identity;
use crate::metadata::Capabilities;
use crate::registry::{SessionRegistry, SessionSettings};
use cura_postprocess_proto::broadcast::v0 as broadcast_pb;
use cura_postprocess_proto::broadcast::v0::broadcast_service_server::BroadcastService;
use cura_postprocess_proto::handshake::v0 as handshake_pb;
use cura_postprocess_proto::handshake::v0::handshake_service_server::HandshakeService;
use cura_postprocess_proto::postprocess::v0 as postprocess_pb;
use cura_postprocess_proto::postprocess::v0::postprocess_modify_service_server::PostprocessModifyService;
use std::sync::Arc;
use tonic::{Request, Response, Status};

/// Default setting echoed into layer annotations.
pub const DEFAULT_ANNOTATED_SETTING: &str = "jerk_enabled";

/// State shared by all three slot services.
#[derive(Clone)]
pub struct PluginState {
    pub capabilities: Arc<Capabilities>,
    pub registry: Arc<SessionRegistry>,
    /// Setting key whose value is written into every annotation.
    pub annotated_setting: Arc<str>,
}

impl PluginState {
    pub fn new(annotated_setting: &str) -> Self {
        Self {
            capabilities: Arc::new(Capabilities::new()),
            registry: Arc::new(SessionRegistry::new()),
            annotated_setting: Arc::from(annotated_setting),
        }
    }
}

impl Default for PluginState {
    fn default() -> Self {
        Self::new(DEFAULT_ANNOTATED_SETTING)
    }
}

#[derive(Clone)]
pub struct HandshakeServiceImpl {
    pub state: PluginState,
}

#[tonic::async_trait]
impl HandshakeService for HandshakeServiceImpl {
    async fn call(
        &self,
        req: Request<handshake_pb::CallRequest>,
    ) -> Result<Response<handshake_pb::CallResponse>, Status> {
        let req = req.into_inner();
        let capabilities = &self.state.capabilities;
        tracing::info!(
            slot_id = req.slot_id,
            slot = ?req.slot_id(),
            version_range = %req.version_range,
            "received handshake request"
        );
        if req.slot_id != capabilities.slot as i32 {
            tracing::warn!(
                requested = req.slot_id,
                serving = ?capabilities.slot,
                "handshake for a slot this plugin does not serve"
            );
        }
        Ok(Response::new(capabilities.to_response()))
    }
}

#[derive(Clone)]
pub struct BroadcastServiceImpl {
    pub state: PluginState,
}

#[tonic::async_trait]
impl BroadcastService for BroadcastServiceImpl {
    async fn broadcast_settings(
        &self,
        req: Request<broadcast_pb::BroadcastServiceSettingsRequest>,
    ) -> Result<Response<()>, Status> {
        let identity = match connection_identity(req.metadata()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("dropping settings broadcast: {e}");
                return Ok(Response::new(()));
            }
        };

        let settings: SessionSettings = req
            .into_inner()
            .global_settings
            .map(|s| s.settings)
            .unwrap_or_default();
        for (key, value) in &settings {
            tracing::debug!(identity = %identity, %key, %value, "received setting");
        }
        tracing::info!(identity = %identity, count = settings.len(), "settings stored");

        self.state.registry.replace_settings(&identity, settings);
        Ok(Response::new(()))
    }
}

#[derive(Clone)]
pub struct PostprocessServiceImpl {
    pub state: PluginState,
}

#[tonic::async_trait]
impl PostprocessModifyService for PostprocessServiceImpl {
    async fn call(
        &self,
        req: Request<postprocess_pb::CallRequest>,
    ) -> Result<Response<postprocess_pb::CallResponse>, Status> {
        let identity = connection_identity(req.metadata());
        let chunk = req.into_inner().gcode_word;

        let identity = match identity {
            Ok(id) => id,
            Err(e) => {
                // Untagged call: forward the chunk as-is and keep no state for it.
                tracing::warn!("skipping postprocess: {e}");
                return Ok(Response::new(postprocess_pb::CallResponse { gcode_word: chunk }));
            }
        };

        let key = &*self.state.annotated_setting;
        match self.state.registry.transform(&identity, chunk, key) {
            Ok(gcode_word) => {
                tracing::debug!(
                    identity = %identity,
                    held = self.state.registry.buffer_depth(&identity),
                    "postprocessed chunk"
                );
                Ok(Response::new(postprocess_pb::CallResponse { gcode_word }))
            }
            Err(e) => {
                tracing::error!(identity = %identity, "postprocess failed: {e}");
                Err(e.to_status())
            }
        }
    }
}
