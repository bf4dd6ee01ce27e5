//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{CheckCommandHandler, RenderCommandHandler, SendCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;
use crate::notifications::RecipientDescriptor;

/// Execute a CLI command with the given settings
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `settings` - Loaded and validated settings
///
/// # Errors
/// Returns errors from command handlers. Channel failures during `send` are
/// printed, not returned.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Commands::Check => CheckCommandHandler::new(settings).execute(),
        Commands::Render {
            event,
            channel,
            data,
        } => RenderCommandHandler::new(&settings).execute(
            *event,
            (*channel).into(),
            &data.clone().unwrap_or_default(),
        ),
        Commands::Send {
            event,
            user_id,
            email,
            phone,
            push_token,
            data,
        } => {
            let recipient = RecipientDescriptor {
                user_id: user_id.clone(),
                email: email.clone(),
                phone: phone.clone(),
                push_token: push_token.clone(),
                data: data.clone().unwrap_or_default(),
            };
            SendCommandHandler::new(&settings)
                .execute(*event, recipient)
                .await
                .map(|_| ())
        }
    }
}
