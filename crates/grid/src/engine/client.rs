//! Client — core struct, constructor, error types.
//!
//! Image operations live in `image.rs`, which adds further
//! `impl EngineClient` blocks.

use bollard::Docker;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Docker connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Bollard error: {0}")]
    BollardError(#[from] bollard::errors::Error),
}

#[derive(Debug, Clone)]
pub struct EngineClient {
    /// The bollard Docker client. `pub(super)` so sibling domain
    /// modules can call bollard APIs directly.
    pub(super) client: Docker,
    /// Label namespace tracked images carry, e.g. `io.gridboard.`.
    label_ns: String,
}

impl EngineClient {
    pub fn new(socket_path: &str, label_ns: &str) -> Result<Self, EngineError> {
        let connection = if socket_path.is_empty() {
            Docker::connect_with_defaults()
                .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?
        } else {
            let clean_path = socket_path.trim_start_matches("unix://");
            Docker::connect_with_socket(clean_path, 120, &bollard::API_DEFAULT_VERSION)
                .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?
        };

        Ok(EngineClient {
            client: connection,
            label_ns: label_ns.to_string(),
        })
    }

    pub fn label_ns(&self) -> &str {
        &self.label_ns
    }

    /// Label key that carries an image's job-spec subtype.
    pub fn type_label(&self) -> String {
        format!("{}type", self.label_ns)
    }
}
