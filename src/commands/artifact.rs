use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{value_name, ArtifactCommands};
use crate::client::{ApiResponse, ArtifactClient, NewArtifact};
use crate::display::{render, rows, Format};

pub async fn handle<W: Write>(
    client: &ArtifactClient,
    command: ArtifactCommands,
    format: Format,
    out: &mut W,
) -> Result<()> {
    match command {
        ArtifactCommands::List { artifact_id } => {
            info!("list artifacts ...");
            let response = match artifact_id.as_deref() {
                Some(id) => client.get_artifact(id).await,
                None => client.get_all_artifacts().await,
            };
            let body = response
                .and_then(ApiResponse::into_success)
                .context("Failed to list artifacts")?;
            render(out, format, &body, rows::artifact_table)
        }
        ArtifactCommands::Create {
            file_name,
            file_version,
            vendor,
            artifact_type,
            storage,
            architecture,
        } => {
            info!(%file_name, %file_version, "create artifact ...");
            let artifact = NewArtifact {
                file_name,
                file_version,
                vendor: value_name(vendor),
                artifact_type: value_name(artifact_type),
                storage: value_name(storage),
                architecture: value_name(architecture),
            };
            client
                .create_artifact(&artifact)
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to create artifact")?;
            writeln!(out, "created artifact {}", artifact.file_name)?;
            Ok(())
        }
        ArtifactCommands::Delete { artifact_id } => {
            info!(%artifact_id, "delete artifact ...");
            client
                .delete_artifact(&artifact_id)
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to delete artifact")?;
            writeln!(out, "deleted artifact {artifact_id}")?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Architecture, ArtifactType, Storage, Vendor};
    use crate::client::test_support::api_client;
    use httpmock::prelude::*;
    use serde_json::json;

    async fn run(server: &MockServer, command: ArtifactCommands, format: Format) -> Result<String> {
        let client = ArtifactClient::new(api_client(server));
        let mut out = Vec::new();
        handle(&client, command, format, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn list_table_defaults_missing_architecture() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/artifact/a-1");
                then.status(200).json_body(json!([{
                    "artifact_id": {"S": "a-1"},
                    "artifact_type": {"S": "container"},
                    "file_name": {"S": "ceos.tar"},
                    "file_version": {"S": "4.31"},
                    "owner": {"S": "alice"},
                    "storage": {"S": "docker"},
                    "vendor": {"S": "arista"}
                }]));
            })
            .await;

        let command = ArtifactCommands::List {
            artifact_id: Some("a-1".to_string()),
        };
        let printed = run(&server, command, Format::Table).await.unwrap();

        assert!(printed.contains("artifact-id"));
        assert!(printed.contains("architecture"));
        assert!(printed.contains("│ x86_64       │"));
        assert!(printed.contains("ceos.tar"));
    }

    #[tokio::test]
    async fn create_sends_cli_spellings() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/artifact").json_body(json!({
                    "file_name": "n9kv.qcow2",
                    "file_version": "10.3",
                    "vendor": "cisco",
                    "artifact_type": "qcow",
                    "storage": "s3",
                    "architecture": "x86_64"
                }));
                then.status(201).json_body(json!({}));
            })
            .await;

        let command = ArtifactCommands::Create {
            file_name: "n9kv.qcow2".to_string(),
            file_version: "10.3".to_string(),
            vendor: Vendor::Cisco,
            artifact_type: ArtifactType::Qcow,
            storage: Storage::S3,
            architecture: Architecture::X86_64,
        };
        let printed = run(&server, command, Format::Table).await.unwrap();

        mock.assert_async().await;
        assert_eq!(printed, "created artifact n9kv.qcow2\n");
    }

    #[tokio::test]
    async fn delete_failure_keeps_server_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/artifact/a-404");
                then.status(403).body("not your artifact");
            })
            .await;

        let command = ArtifactCommands::Delete {
            artifact_id: "a-404".to_string(),
        };
        let err = run(&server, command, Format::Table).await.unwrap_err();
        assert!(format!("{err:#}").contains("not your artifact"));
    }
}
