use crate::{utils, Data, Error};
use poise::builtins::on_error as poise_on_error;
use poise::serenity_prelude as serenity;
use poise::FrameworkError;
use tracing::{error, info};

pub async fn handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    _data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::GuildCreate { guild, .. } => {
            info!("Joined Guild {}: {}", guild.id, guild.name);
        }
        _ => {}
    }

    Ok(())
}

pub async fn error_handler(err: FrameworkError<'_, Data, Error>) {
    match err {
        FrameworkError::ArgumentParse { error, input, ctx, .. } => {
            let description = match input {
                Some(input) => format!("Could not parse `{}`: {}", input, error),
                None => format!("Missing required argument: {}", error),
            };
            utils::send_err_embed(ctx, "Invalid argument", &description).await;
        }
        FrameworkError::MissingUserPermissions { ctx, .. } => {
            utils::send_err_embed(
                ctx,
                "Permission denied",
                "You need administrator permissions to use this command.",
            )
            .await;
        }
        // The role gate already replied with an access-denied embed
        FrameworkError::CommandCheckFailed { .. } => {}
        FrameworkError::UnknownCommand { ctx, msg, prefix, .. } => {
            let embed = serenity::CreateEmbed::new()
                .title("Command not found")
                .color(utils::COLOR_ERROR)
                .description(format!(
                    "Unknown command. Use `{}help` to see available commands.",
                    prefix
                ));
            let _ = msg
                .channel_id
                .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
                .await;
        }
        FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Command {} failed: {}",
                ctx.command().qualified_name,
                error
            );
            utils::send_err_embed(
                ctx,
                "Unexpected error",
                "An unexpected error occurred. Please try again later.",
            )
            .await;
        }
        other => {
            if let Err(e) = poise_on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}
