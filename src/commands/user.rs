use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::UserCommands;
use crate::client::{ApiResponse, UserClient, UserSettings};
use crate::display::{render, rows, Format};
use crate::error::ShellError;
use crate::utils::write_json;

pub async fn handle<W: Write>(
    client: &UserClient,
    command: UserCommands,
    format: Format,
    out: &mut W,
) -> Result<()> {
    match command {
        UserCommands::List => {
            info!("who am i ...");
            let body = client
                .whoami()
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to fetch user")?;
            render(out, format, &body, rows::user_table)
        }
        UserCommands::Update {
            region,
            ami_id,
            instance_size,
            reservation_size,
        } => {
            let settings = UserSettings {
                region,
                ami_id,
                instance_size,
                reservation_size,
            };
            if settings.is_empty() {
                return Err(ShellError::input(
                    "nothing to update, pass at least one of --region, --ami-id, --instance-size, --reservation-size",
                )
                .into());
            }

            info!(?settings, "update user ...");
            let body = client
                .update_user(&settings)
                .await
                .and_then(ApiResponse::into_success)
                .context("Failed to update user")?;
            write_json(out, &body)
        }
    }
}
