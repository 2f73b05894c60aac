use crate::{utils, Context, Error};
use humantime::format_duration;
use serenity::builder::CreateEmbed;
use std::time::Duration;

/// Show the available commands and upload limits
#[poise::command(slash_command, prefix_command, rename = "help")]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let config = ctx.data().config;
    let prefix = &config.discord.prefix;

    let embed = CreateEmbed::new()
        .title("Roblox place bot commands")
        .description("Upload and manage Roblox place files")
        .color(utils::COLOR_INFO)
        .field(
            format!("`{}help`", prefix),
            "Show this help message",
            false,
        )
        .field(
            format!("`{}upload`", prefix),
            "Upload a Roblox place file (.rbxl or .rbxlx)\nAttach the file to your message!",
            false,
        )
        .field(
            format!("`{}publish <file_id>`", prefix),
            "Publish an uploaded place file",
            false,
        )
        .field(
            format!("`{}status`", prefix),
            "Show bot status and storage statistics",
            false,
        )
        .field(
            format!("`{}cleanup [hours]`", prefix),
            "Remove uploads older than the given age (admin only)",
            false,
        )
        .field(
            "Supported formats",
            "`.rbxl` - Roblox binary place files\n`.rbxlx` - Roblox XML place files",
            false,
        )
        .field(
            "File limits",
            format!("Maximum file size: {} MB", config.storage.max_file_size_mb),
            false,
        )
        .field(
            "Access control",
            format!(
                "Only users with the `{}` role can use this bot",
                config.access.allowed_role_name
            ),
            false,
        );

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Show bot status and storage statistics
#[poise::command(slash_command, prefix_command, rename = "status")]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let config = data.config;

    let upload_count = brickbot_db::count_uploads(data.db).await?;
    let recorded_bytes = brickbot_db::total_upload_bytes(data.db).await?;
    let disk = data.store.stats().await?;
    let guilds = ctx.serenity_context().cache.guilds().len();

    // Somehow get information about the process
    let pid = sysinfo::get_current_pid().expect("Unable to get current process ID");
    let s = sysinfo::System::new_all();
    let process = s.process(pid).expect("Unable to get process info");

    let embed = CreateEmbed::new()
        .title("Bot status")
        .description("Current bot status and statistics")
        .color(utils::COLOR_INFO)
        .field(
            "Statistics",
            format!(
                "**Uploaded files:** {}\n**Storage used:** {} ({} on disk)\n**Guilds:** {}",
                upload_count,
                utils::format_size(recorded_bytes),
                utils::format_size(disk.total_bytes),
                guilds
            ),
            false,
        )
        .field(
            "Process",
            format!(
                "**Version:** {} (Rust {})\n**Uptime:** {}\n**Memory:** {:.2} MB",
                crate::built_info::PKG_VERSION,
                crate::built_info::RUSTC_VERSION,
                format_duration(Duration::from_secs(process.run_time())),
                (process.memory() / 1024 / 1024)
            ),
            false,
        )
        .field(
            "Configuration",
            format!(
                "**Max file size:** {} MB\n**Supported formats:** .rbxl, .rbxlx\n**Command prefix:** `{}`\n**Retention:** {}h",
                config.storage.max_file_size_mb,
                config.discord.prefix,
                config.storage.retention_hours
            ),
            false,
        );

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
