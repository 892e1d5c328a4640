use std::io::Write;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use crate::cli::{ListView, TopologyCommands};
use crate::client::{ApiResponse, TopologyClient};
use crate::display::{render, rows, Format};
use crate::utils::{parse_inline, read_payload, write_json};

pub async fn handle<W: Write>(
    client: &TopologyClient,
    command: TopologyCommands,
    format: Format,
    out: &mut W,
) -> Result<()> {
    match command {
        TopologyCommands::Create { topology_name } => {
            info!(%topology_name, "create topology ...");
            let body = client
                .create_topology(&topology_name)
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to create topology")?;
            write_json(out, &body)
        }
        TopologyCommands::List {
            topology_id,
            config,
            status,
            reservation,
            workflow,
        } => {
            let view = ListView::from_flags(config, status, reservation, workflow);
            list(client, topology_id.as_deref(), view, format, out).await
        }
        TopologyCommands::Delete(id) => {
            info!(topology_id = %id.topology_id, "delete topology ...");
            client
                .delete_topology(&id.topology_id)
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to delete topology")?;
            writeln!(out, "deleted topology {}", id.topology_id)?;
            Ok(())
        }
        TopologyCommands::Update { id, topology_json } => {
            info!(topology_id = %id.topology_id, "update topology ...");
            let config = match topology_json {
                Some(path) => read_payload(&path)?,
                None => json!({}),
            };
            let body = client
                .update_topology(&id.topology_id, &config)
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to update topology")?;
            write_json(out, &body)
        }
        TopologyCommands::Reserve { id, host_json } => {
            info!(topology_id = %id.topology_id, "reserve topology ...");
            let host = parse_inline("--host-json", &host_json)?;
            let body = client
                .reserve(&id.topology_id, &host)
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to reserve topology")?;
            write_json(out, &body)
        }
        TopologyCommands::Release { id, reservation_id } => {
            info!(topology_id = %id.topology_id, "release topology ...");
            let body = client
                .release(&id.topology_id, reservation_id.as_deref())
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to release topology")?;
            write_json(out, &body)
        }
        TopologyCommands::Deploy { id, dry_run } => {
            info!(topology_id = %id.topology_id, dry_run, "deploy topology ...");
            let body = client
                .deploy(&id.topology_id, dry_run)
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to deploy topology")?;
            write_json(out, &body)
        }
        TopologyCommands::Undeploy { id, dry_run } => {
            info!(topology_id = %id.topology_id, dry_run, "undeploy topology ...");
            let body = client
                .undeploy(&id.topology_id, dry_run)
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to undeploy topology")?;
            write_json(out, &body)
        }
        TopologyCommands::Ping(id) => {
            info!(topology_id = %id.topology_id, "ping topology ...");
            let body = client
                .ping(&id.topology_id)
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to ping topology")?;
            write_json(out, &body)
        }
        TopologyCommands::Bootstrap { id, params } => {
            info!(
                topology_id = %id.topology_id,
                %params,
                "run bootstrap workflow ..."
            );
            let params = parse_inline("--params", &params)?;
            let body = client
                .bootstrap(&id.topology_id, &params)
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to bootstrap topology")?;
            write_json(out, &body)
        }
    }
}

async fn list<W: Write>(
    client: &TopologyClient,
    topology_id: Option<&str>,
    view: ListView,
    format: Format,
    out: &mut W,
) -> Result<()> {
    info!(?view, "list topologies ...");
    let response = match topology_id {
        Some(id) => client.get_topology(id).await,
        None => client.get_all_topologies().await,
    };
    let body = response
        .and_then(ApiResponse::into_success)
        .context("Failed to list topologies")?;

    match view {
        ListView::Records => render(out, format, &body, rows::topology_table),
        ListView::Config => write_json(out, &rows::embedded_blobs(&body, "topology_config")),
        ListView::Status => write_json(out, &rows::embedded_blobs(&body, "topology_status")),
        ListView::Reservation => match format {
            Format::Json => write_json(out, &rows::reservations(&body)),
            Format::Table => rows::reservation_table(&body)
                .write_to(out)
                .context("Failed to write table"),
        },
        ListView::Workflow => match format {
            Format::Json => write_json(out, &rows::workflow_histories(&body)),
            Format::Table => rows::workflow_table(&body)
                .write_to(out)
                .context("Failed to write table"),
        },
    }
}
