use crate::{utils, Context, Error};
use brickbot_db::UploadRecord;
use brickbot_files::validate::{self, PlaceKind};
use serenity::all::{Attachment, CreateEmbedFooter};
use serenity::builder::CreateEmbed;
use tracing::info;

/// Upload a Roblox place file (.rbxl or .rbxlx)
#[poise::command(slash_command, prefix_command, rename = "upload", guild_only)]
pub async fn upload(
    ctx: Context<'_>,
    #[description = "The place file to upload"] file: Attachment,
) -> Result<(), Error> {
    let data = ctx.data();
    let config = data.config;
    let limit = config.storage.max_file_size_mb * 1024 * 1024;

    let Some(kind) = PlaceKind::from_filename(&file.filename) else {
        utils::send_err_embed(
            ctx,
            "Invalid file type",
            "Please attach a Roblox place file (`.rbxl` or `.rbxlx`).",
        )
        .await;
        return Ok(());
    };

    if let Err(e) = validate::validate_size(file.size as u64, limit) {
        utils::send_err_embed(ctx, "Upload failed", &e.to_string()).await;
        return Ok(());
    }

    let processing = CreateEmbed::new()
        .title("Processing upload...")
        .color(utils::COLOR_WARNING)
        .description(format!(
            "Uploading and validating `{}`\nPlease wait...",
            file.filename
        ));
    let reply = ctx
        .send(poise::CreateReply::default().embed(processing))
        .await?;

    let bytes = file.download().await?;

    let info = match validate::validate_place_file(&file.filename, &bytes) {
        Ok(info) => info,
        Err(e) => {
            let embed = CreateEmbed::new()
                .title("Invalid Roblox file")
                .color(utils::COLOR_ERROR)
                .description(format!("**Error:** {}", e))
                .field(
                    "Requirements",
                    "- File must be a valid .rbxl or .rbxlx format\n\
                     - File must contain proper Roblox place structure\n\
                     - File must not be corrupted",
                    false,
                );
            reply
                .edit(ctx, poise::CreateReply::default().embed(embed))
                .await?;
            return Ok(());
        }
    };

    let file_id = utils::new_file_id();
    let stored_name = format!("{}.{}", file_id, kind.extension());
    data.store.save(&stored_name, &bytes).await?;

    let record = UploadRecord {
        id: file_id.clone(),
        original_name: utils::sanitize_filename(&file.filename),
        stored_name,
        size_bytes: bytes.len() as i64,
        kind: kind.extension().to_string(),
        place_name: info.place_name.clone(),
        uploader_id: ctx.author().id.get() as i64,
        uploaded_at: chrono::Utc::now(),
    };
    brickbot_db::insert_upload(data.db, record).await?;

    info!(
        "User {} uploaded file {} ({})",
        ctx.author().id,
        file_id,
        file.filename
    );

    let place_name = info.place_name.as_deref().unwrap_or("Unknown");
    let embed = CreateEmbed::new()
        .title("Upload successful!")
        .color(utils::COLOR_SUCCESS)
        .description("Your Roblox place file has been uploaded and validated.")
        .field(
            "File information",
            format!(
                "**Name:** {}\n**Place:** {}\n**Type:** {}\n**Size:** {}",
                file.filename,
                place_name,
                kind.label(),
                utils::format_size(bytes.len() as u64)
            ),
            false,
        )
        .field(
            "Next steps",
            format!(
                "To publish this place, use:\n`{}publish {}`",
                config.discord.prefix, file_id
            ),
            false,
        )
        .footer(CreateEmbedFooter::new(format!(
            "File ID: {}",
            file_id
        )));

    reply
        .edit(ctx, poise::CreateReply::default().embed(embed))
        .await?;

    Ok(())
}
