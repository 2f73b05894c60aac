use crate::{roblox, utils, Context, Error};
use serenity::all::CreateEmbedFooter;
use serenity::builder::CreateEmbed;
use std::time::Duration;

/// Publish an uploaded place file
#[poise::command(slash_command, prefix_command, rename = "publish")]
pub async fn publish(
    ctx: Context<'_>,
    #[description = "File id returned by the upload command"] file_id: String,
) -> Result<(), Error> {
    let data = ctx.data();
    let config = data.config;

    // Unknown id, or a record whose file was already cleaned up: both are
    // not-found, never a fabricated success.
    let record = brickbot_db::get_upload(data.db, &file_id).await;
    let record = match record {
        Some(rec) if data.store.exists(&rec.stored_name).await => rec,
        _ => {
            utils::send_err_embed(
                ctx,
                "File not found",
                &format!(
                    "No file found with ID: `{}`\n\nMake sure you've uploaded the file first using `{}upload`",
                    file_id, config.discord.prefix
                ),
            )
            .await;
            return Ok(());
        }
    };

    let publishing = CreateEmbed::new()
        .title("Publishing place...")
        .color(utils::COLOR_WARNING)
        .description("Uploading and publishing your place file.\nThis may take a few moments...");
    let reply = ctx
        .send(poise::CreateReply::default().embed(publishing))
        .await?;

    let receipt =
        roblox::mock_publish(Duration::from_secs(config.publish.delay_secs), &record.id).await;

    let place_label = record
        .place_name
        .as_deref()
        .unwrap_or(record.original_name.as_str());
    let embed = CreateEmbed::new()
        .title("Place published!")
        .color(utils::COLOR_SUCCESS)
        .description(format!("`{}` has been published.", place_label))
        .field(
            "Place details",
            format!(
                "**Place ID:** {}\n**Universe ID:** {}\n**Visibility:** {}",
                receipt.place_id, receipt.universe_id, receipt.visibility
            ),
            false,
        )
        .field("Links", format!("[Open place]({})", receipt.game_url), false)
        .footer(CreateEmbedFooter::new(format!(
            "Published at {}",
            receipt.published_at.format("%Y-%m-%d %H:%M:%S UTC")
        )));

    reply
        .edit(ctx, poise::CreateReply::default().embed(embed))
        .await?;

    Ok(())
}
