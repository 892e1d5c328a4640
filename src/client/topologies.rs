use serde::Serialize;
use serde_json::Value;

use super::{ApiClient, ApiResponse};
use crate::error::ShellError;

const PATH: &str = "topology";

#[derive(Debug, Serialize)]
struct TopologyCreate<'a> {
    topology_name: &'a str,
}

#[derive(Debug, Serialize)]
struct TopologyUpdate<'a> {
    topology_config: &'a Value,
}

#[derive(Debug, Serialize)]
struct ReleaseRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reservation_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DeployRequest {
    dry_run: bool,
}

pub struct TopologyClient {
    api: ApiClient,
}

impl TopologyClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all_topologies(&self) -> Result<ApiResponse, ShellError> {
        self.api.get(&[PATH]).await
    }

    pub async fn get_topology(&self, topology_id: &str) -> Result<ApiResponse, ShellError> {
        self.api.get(&[PATH, topology_id]).await
    }

    pub async fn create_topology(&self, topology_name: &str) -> Result<ApiResponse, ShellError> {
        self.api
            .post(&[PATH], &TopologyCreate { topology_name })
            .await
    }

    pub async fn update_topology(
        &self,
        topology_id: &str,
        config: &Value,
    ) -> Result<ApiResponse, ShellError> {
        self.api
            .put(
                &[PATH, topology_id],
                &TopologyUpdate {
                    topology_config: config,
                },
            )
            .await
    }

    pub async fn delete_topology(&self, topology_id: &str) -> Result<ApiResponse, ShellError> {
        self.api.delete(&[PATH, topology_id]).await
    }

    pub async fn reserve(&self, topology_id: &str, host: &Value) -> Result<ApiResponse, ShellError> {
        self.api
            .post(&[PATH, topology_id, "reserve"], host)
            .await
    }

    pub async fn release(
        &self,
        topology_id: &str,
        reservation_id: Option<&str>,
    ) -> Result<ApiResponse, ShellError> {
        self.api
            .post(
                &[PATH, topology_id, "release"],
                &ReleaseRequest { reservation_id },
            )
            .await
    }

    pub async fn deploy(&self, topology_id: &str, dry_run: bool) -> Result<ApiResponse, ShellError> {
        self.api
            .post(&[PATH, topology_id, "deploy"], &DeployRequest { dry_run })
            .await
    }

    pub async fn undeploy(
        &self,
        topology_id: &str,
        dry_run: bool,
    ) -> Result<ApiResponse, ShellError> {
        self.api
            .post(
                &[PATH, topology_id, "undeploy"],
                &DeployRequest { dry_run },
            )
            .await
    }

    pub async fn ping(&self, topology_id: &str) -> Result<ApiResponse, ShellError> {
        self.api.get(&[PATH, topology_id, "ping"]).await
    }

    pub async fn bootstrap(
        &self,
        topology_id: &str,
        params: &Value,
    ) -> Result<ApiResponse, ShellError> {
        self.api
            .post(&[PATH, topology_id, "bootstrap"], params)
            .await
    }
}
