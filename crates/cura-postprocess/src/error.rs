use thiserror::Error;
use tonic::Status;

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("{key} not found in client metadata")]
    MissingIdentity { key: &'static str },

    #[error("{key} in client metadata is not printable ascii")]
    InvalidIdentity { key: &'static str },

    #[error("setting {key} has not been broadcast for {identity}")]
    MissingSetting { identity: String, key: String },

    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

impl PluginError {
    /// Convert to a call-level gRPC status.
    ///
    /// Handlers skip calls with a missing or unreadable identity instead of
    /// failing them, so only session state and transport errors reach a
    /// caller through this mapping.
    pub fn to_status(&self) -> Status {
        match self {
            PluginError::MissingIdentity { .. } | PluginError::InvalidIdentity { .. } => {
                Status::invalid_argument(self.to_string())
            }
            PluginError::MissingSetting { .. } => Status::internal(self.to_string()),
            PluginError::Transport(_) => Status::unavailable("transport failure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn missing_setting_is_internal() {
        let err = PluginError::MissingSetting {
            identity: "u1".to_string(),
            key: "jerk_enabled".to_string(),
        };
        let status = err.to_status();
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(
            status.message(),
            "setting jerk_enabled has not been broadcast for u1"
        );
    }

    #[test]
    fn identity_errors_are_invalid_argument() {
        let err = PluginError::InvalidIdentity {
            key: "cura-engine-uuid",
        };
        let status = err.to_status();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(
            status.message(),
            "cura-engine-uuid in client metadata is not printable ascii"
        );
    }
}
