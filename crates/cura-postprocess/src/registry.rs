use crate::error::PluginError;
use crate::lookback::{AnnotatedSetting, Lookback};
use dashmap::DashMap;
use std::collections::HashMap;

/// Settings broadcast by one engine session.
pub type SessionSettings = HashMap<String, String>;

/// Per-session state keyed by the engine's connection identity.
///
/// Uses `DashMap` so calls for different sessions never contend on a global
/// lock. Settings and lookback buffers live in separate maps; the identity is
/// the only thing joining them. Entries are never evicted.
#[derive(Default)]
pub struct SessionRegistry {
    settings: DashMap<String, SessionSettings>,
    buffers: DashMap<String, Lookback>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session's settings, dropping whatever it broadcast before.
    pub fn replace_settings(&self, identity: &str, settings: SessionSettings) {
        self.settings.insert(identity.to_string(), settings);
    }

    /// Look up one setting, cloned so the caller doesn't hold the map entry.
    pub fn setting(&self, identity: &str, key: &str) -> Result<String, PluginError> {
        self.settings
            .get(identity)
            .and_then(|s| s.get(key).cloned())
            .ok_or_else(|| PluginError::MissingSetting {
                identity: identity.to_string(),
                key: key.to_string(),
            })
    }

    /// Run one postprocess exchange for `identity`.
    ///
    /// The annotated setting is resolved before the buffer is touched, so a
    /// failed exchange leaves the session's lookback exactly as it was.
    pub fn transform(
        &self,
        identity: &str,
        chunk: String,
        setting_key: &str,
    ) -> Result<String, PluginError> {
        let value = self.setting(identity, setting_key)?;
        let mut buffer = self.buffers.entry(identity.to_string()).or_default();
        Ok(buffer.advance(
            chunk,
            AnnotatedSetting {
                key: setting_key,
                value: &value,
            },
        ))
    }

    /// Chunks currently held back for `identity`.
    pub fn buffer_depth(&self, identity: &str) -> usize {
        self.buffers.get(identity).map(|b| b.depth()).unwrap_or(0)
    }

    /// Number of sessions that have broadcast settings.
    pub fn session_count(&self) -> usize {
        self.settings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> SessionSettings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn settings_are_last_write_wins() {
        let registry = SessionRegistry::new();
        registry.replace_settings("u1", settings(&[("a", "1")]));
        registry.replace_settings("u1", settings(&[("b", "2")]));
        assert_eq!(registry.setting("u1", "b").unwrap(), "2");
        assert!(matches!(
            registry.setting("u1", "a"),
            Err(PluginError::MissingSetting { .. })
        ));
        assert_eq!(registry.session_count(), 1);
    }

    #[test]
    fn transform_without_settings_leaves_buffer_untouched() {
        let registry = SessionRegistry::new();
        let err = registry
            .transform("u1", "G1 X1".to_string(), "jerk_enabled")
            .unwrap_err();
        assert!(matches!(err, PluginError::MissingSetting { .. }));
        assert_eq!(registry.buffer_depth("u1"), 0);

        registry.replace_settings("u1", settings(&[("jerk_enabled", "True")]));
        let out = registry
            .transform("u1", "G1 X2".to_string(), "jerk_enabled")
            .unwrap();
        assert_eq!(out, "G1 X2");
        assert_eq!(registry.buffer_depth("u1"), 1);
    }

    #[test]
    fn failure_mid_stream_keeps_held_chunk() {
        let registry = SessionRegistry::new();
        registry.replace_settings("u1", settings(&[("jerk_enabled", "True")]));
        registry
            .transform("u1", "a\nb\nc".to_string(), "jerk_enabled")
            .unwrap();

        // A broadcast without the key makes the next exchange fail...
        registry.replace_settings("u1", settings(&[("other", "x")]));
        assert!(registry.transform("u1", "d".to_string(), "jerk_enabled").is_err());

        // ...and once it is back, the stream continues from the held chunk.
        registry.replace_settings("u1", settings(&[("jerk_enabled", "False")]));
        let out = registry
            .transform("u1", "e".to_string(), "jerk_enabled")
            .unwrap();
        assert_eq!(out, "; last line of layer before: c and jerk_enabled=False\ne");
    }

    #[test]
    fn sessions_are_isolated() {
        let registry = SessionRegistry::new();
        registry.replace_settings("x", settings(&[("jerk_enabled", "True")]));
        registry.replace_settings("y", settings(&[("jerk_enabled", "False")]));

        let key = "jerk_enabled";
        assert_eq!(registry.transform("x", "x1".to_string(), key).unwrap(), "x1");
        assert_eq!(registry.transform("y", "y1".to_string(), key).unwrap(), "y1");
        assert_eq!(
            registry.transform("x", "x2".to_string(), key).unwrap(),
            "; first layer and jerk_enabled=True\nx2"
        );
        assert_eq!(
            registry.transform("y", "y2".to_string(), key).unwrap(),
            "; first layer and jerk_enabled=False\ny2"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sessions() {
        let registry = std::sync::Arc::new(SessionRegistry::new());
        let mut handles = Vec::new();
        for n in 0..8 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let id = format!("session-{n}");
                registry.replace_settings(&id, settings(&[("jerk_enabled", "True")]));
                let mut outputs = Vec::new();
                for layer in 0..50 {
                    let chunk = format!(";LAYER:{layer}\nG1 X{n}\nG1 Y{layer}");
                    outputs.push(registry.transform(&id, chunk, "jerk_enabled").unwrap());
                    tokio::task::yield_now().await;
                }
                outputs
            }));
        }
        for (n, handle) in handles.into_iter().enumerate() {
            let outputs = handle.await.unwrap();
            assert_eq!(outputs[0], format!(";LAYER:0\nG1 X{n}\nG1 Y0"));
            for (layer, out) in outputs.iter().enumerate().skip(1) {
                assert_eq!(
                    *out,
                    format!(
                        "; last line of layer before: G1 Y{} and jerk_enabled=True\n;LAYER:{layer}\nG1 X{n}\nG1 Y{layer}",
                        layer - 1
                    )
                );
            }
        }
    }
}
