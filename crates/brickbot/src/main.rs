use poise::serenity_prelude as serenity;
use brickbot_config::{self, config::BrickbotConfig};
use brickbot_db::{get_db, init_db, DatabaseConnection};
use brickbot_files::FileStore;
use tracing::{info, warn, Level};
use tracing_subscriber::{filter, prelude::*};

mod commands;
mod gate;
mod handlers;
mod roblox;
mod tasks;
mod utils;

pub mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub struct Data {
    config: &'static BrickbotConfig,
    db: &'static DatabaseConnection,
    store: FileStore,
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

async fn on_ready(
    ctx: &serenity::Context,
    ready: &serenity::Ready,
    framework: &poise::Framework<Data, Error>,
) -> Result<Data, Error> {
    info!("Logged in as {}", ready.user.name);
    info!("Bot is in {} guilds", ready.guilds.len());
    let config: &BrickbotConfig = brickbot_config::get_config();

    // Initialize the database and the upload store
    init_db(&config.database.url).await;
    let store = FileStore::open(&config.storage.upload_dir).await?;

    ctx.set_activity(Some(serenity::ActivityData::watching(format!(
        "for Roblox place files | {}help",
        config.discord.prefix
    ))));

    // Ensure no global commands to avoid duplicates alongside guild-scoped commands
    if let Err(e) = serenity::Command::set_global_commands(&ctx.http, vec![]).await {
        warn!("Failed to clear global commands: {}", e);
    }
    // Register slash commands in all guilds we're currently in for fast availability
    // (Global propagation can take up to an hour; guild keeps things instant.)
    for g in &ready.guilds {
        let gid = g.id;
        if let Err(e) = poise::builtins::register_in_guild(ctx, &framework.options().commands, gid).await {
            warn!("Failed to register commands in guild {}: {}", gid, e);
        }
    }

    let db = get_db().await;
    tasks::start_cleanup_task(
        db,
        store.clone(),
        config.storage.cleanup_interval_secs,
        config.storage.retention_hours,
    );

    Ok(Data { config, db, store })
}

async fn bot_entrypoint() {
    let config = brickbot_config::get_config();

    let commands = vec![
        commands::meta::help(),
        commands::meta::status(),
        commands::upload::upload(),
        commands::publish::publish(),
        commands::admin::cleanup(),
    ];

    let options = poise::FrameworkOptions {
        commands,
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(config.discord.prefix.clone()),
            execute_self_messages: false,
            execute_untracked_edits: true,
            mention_as_prefix: false,
            ..Default::default()
        },
        command_check: Some(|ctx| Box::pin(gate::check_member_role(ctx))),
        event_handler: |ctx, event, framework, data| {
            Box::pin(handlers::handler(ctx, event, framework, data))
        },
        on_error: |error| Box::pin(handlers::error_handler(error)),
        ..Default::default()
    };

    let framework = poise::Framework::builder()
        .setup(|ctx, ready, framework| Box::pin(on_ready(ctx, ready, framework)))
        .options(options)
        .build();

    let intents = serenity::GatewayIntents::all();

    let client = serenity::ClientBuilder::new(config.discord.token.as_str(), intents)
        .framework(framework)
        .await;

    client.unwrap().start().await.unwrap()
}

fn main() {
    let cfg_path =
        std::env::var("BRICKBOT_CONFIG_FILE").unwrap_or(String::from("config.toml"));
    let config = brickbot_config::load_config(&cfg_path);

    if config.discord.token.is_empty() {
        panic!("Discord token is not set (DISCORD_TOKEN or the configuration file)");
    }

    if config.sentry.dsn.is_empty() {
        warn!("Sentry initialized with empty DSN - will be disabled")
    }

    let _guard = sentry::init((
        config.sentry.dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    // Configure logging with Sentry
    let stdout_log = tracing_subscriber::fmt::layer()
        .compact()
        .with_filter(filter::LevelFilter::from(Level::INFO));

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(sentry_tracing::layer())
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async { bot_entrypoint().await });
}
