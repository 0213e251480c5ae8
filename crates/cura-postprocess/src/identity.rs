use crate::error::PluginError;
use tonic::metadata::MetadataMap;

/// Metadata key under which the engine tags every call with its session uuid.
pub const IDENTITY_KEY: &str = "cura-engine-uuid";

/// Pull the connection identity out of call metadata.
pub fn connection_identity(metadata: &MetadataMap) -> Result<String, PluginError> {
    let value = metadata
        .get(IDENTITY_KEY)
        .ok_or(PluginError::MissingIdentity { key: IDENTITY_KEY })?;
    let id = value
        .to_str()
        .map_err(|_| PluginError::InvalidIdentity { key: IDENTITY_KEY })?;
    Ok(id.to_string())
}
