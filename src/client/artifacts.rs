use serde::Serialize;

use super::{ApiClient, ApiResponse};
use crate::error::ShellError;

const PATH: &str = "artifact";

/// Request body for registering a new artifact.
#[derive(Debug, Clone, Serialize)]
pub struct NewArtifact {
    pub file_name: String,
    pub file_version: String,
    pub vendor: String,
    pub artifact_type: String,
    pub storage: String,
    pub architecture: String,
}

pub struct ArtifactClient {
    api: ApiClient,
}

impl ArtifactClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all_artifacts(&self) -> Result<ApiResponse, ShellError> {
        self.api.get(&[PATH]).await
    }

    pub async fn get_artifact(&self, artifact_id: &str) -> Result<ApiResponse, ShellError> {
        self.api.get(&[PATH, artifact_id]).await
    }

    pub async fn create_artifact(&self, artifact: &NewArtifact) -> Result<ApiResponse, ShellError> {
        self.api.post(&[PATH], artifact).await
    }

    pub async fn delete_artifact(&self, artifact_id: &str) -> Result<ApiResponse, ShellError> {
        self.api.delete(&[PATH, artifact_id]).await
    }
}
