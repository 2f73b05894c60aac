use crate::{tasks, utils, Context, Error};
use serenity::builder::CreateEmbed;
use tracing::error;

/// Remove uploads older than the given age in hours (admin only)
#[poise::command(
    slash_command,
    prefix_command,
    rename = "cleanup",
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR",
    guild_only
)]
pub async fn cleanup(
    ctx: Context<'_>,
    #[description = "Age threshold in hours"] hours: Option<u32>,
) -> Result<(), Error> {
    let data = ctx.data();
    let retention = hours
        .map(u64::from)
        .unwrap_or(data.config.storage.retention_hours);
    if retention == 0 {
        utils::send_err_embed(
            ctx,
            "Invalid threshold",
            "The age threshold must be at least one hour.",
        )
        .await;
        return Ok(());
    }

    let working = CreateEmbed::new()
        .title("Cleaning up files...")
        .color(utils::COLOR_WARNING)
        .description(format!("Removing files older than {} hours...", retention));
    let reply = ctx
        .send(poise::CreateReply::default().embed(working))
        .await?;

    match tasks::cleanup_uploads(data.db, &data.store, retention).await {
        Ok(report) => {
            let embed = CreateEmbed::new()
                .title("Cleanup complete")
                .color(utils::COLOR_SUCCESS)
                .description(format!(
                    "Removed {} uploads and {} orphaned files, freeing {}.",
                    report.records_removed,
                    report.orphans_removed,
                    utils::format_size(report.bytes_freed)
                ));
            reply
                .edit(ctx, poise::CreateReply::default().embed(embed))
                .await?;
        }
        Err(e) => {
            error!("Cleanup error: {}", e);
            let embed = CreateEmbed::new()
                .title("Cleanup failed")
                .color(utils::COLOR_ERROR)
                .description("An error occurred during cleanup.");
            reply
                .edit(ctx, poise::CreateReply::default().embed(embed))
                .await?;
        }
    }

    Ok(())
}
