use serde::Serialize;

use super::{ApiClient, ApiResponse};
use crate::error::ShellError;

const PATH: &str = "user";

/// User settings to change; unset fields are left alone on the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ami_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_size: Option<u32>,
}

impl UserSettings {
    pub fn is_empty(&self) -> bool {
        self.region.is_none()
            && self.ami_id.is_none()
            && self.instance_size.is_none()
            && self.reservation_size.is_none()
    }
}

pub struct UserClient {
    api: ApiClient,
}

impl UserClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn whoami(&self) -> Result<ApiResponse, ShellError> {
        self.api.get(&[PATH]).await
    }

    pub async fn update_user(&self, settings: &UserSettings) -> Result<ApiResponse, ShellError> {
        self.api.put(&[PATH], settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::api_client;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn empty_settings_are_detected() {
        assert!(UserSettings::default().is_empty());
        let settings = UserSettings {
            region: Some("us-west-2".to_string()),
            ..UserSettings::default()
        };
        assert!(!settings.is_empty());
    }

    #[tokio::test]
    async fn update_user_sends_only_provided_settings() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/user")
                    .json_body(json!({"region": "us-west-2", "reservation_size": 4}));
                then.status(200).json_body(json!({"region": "us-west-2"}));
            })
            .await;

        let client = UserClient::new(api_client(&server));
        let settings = UserSettings {
            region: Some("us-west-2".to_string()),
            reservation_size: Some(4),
            ..UserSettings::default()
        };
        client.update_user(&settings).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn whoami_reads_user_resource() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/user");
                then.status(200).json_body(json!({"user_id": "u-1"}));
            })
            .await;

        let client = UserClient::new(api_client(&server));
        let response = client.whoami().await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.body, json!({"user_id": "u-1"}));
    }
}
