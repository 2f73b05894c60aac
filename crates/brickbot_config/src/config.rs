use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct BrickbotConfig {
    pub discord: DiscordConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub access: AccessConfig,
    pub publish: PublishConfig,
    pub sentry: SentryConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    // The Discord token for the bot; DISCORD_TOKEN overrides this
    pub token: String,
    // The text command prefix
    pub prefix: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        DiscordConfig {
            token: String::from(""),
            prefix: String::from("!"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    // The URL of the database to connect to
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: String::from("sqlite://brickbot.sqlite?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    // Directory uploaded place files are stored in
    pub upload_dir: String,
    // Maximum accepted attachment size in megabytes
    pub max_file_size_mb: u64,
    // Default age threshold for cleanup, in hours
    pub retention_hours: u64,
    // How often the background cleanup runs, in seconds
    pub cleanup_interval_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            upload_dir: String::from("storage/uploads"),
            max_file_size_mb: 100,
            retention_hours: 24,
            cleanup_interval_secs: 3600,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    // Role id that unlocks the bot; checked before the name when set
    pub allowed_role_id: Option<u64>,
    // Role name fallback, also used in user-facing messages
    pub allowed_role_name: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        AccessConfig {
            allowed_role_id: None,
            allowed_role_name: String::from("RobloxDev"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    // Seconds the mocked publish takes before reporting success
    pub delay_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        PublishConfig { delay_secs: 3 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SentryConfig {
    pub dsn: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: BrickbotConfig = toml::from_str("").unwrap();
        assert_eq!(config.discord.prefix, "!");
        assert_eq!(config.storage.max_file_size_mb, 100);
        assert_eq!(config.storage.retention_hours, 24);
        assert_eq!(config.storage.upload_dir, "storage/uploads");
        assert_eq!(config.access.allowed_role_name, "RobloxDev");
        assert!(config.access.allowed_role_id.is_none());
        assert_eq!(config.publish.delay_secs, 3);
        assert!(config.sentry.dsn.is_empty());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: BrickbotConfig = toml::from_str(
            r#"
            [storage]
            max_file_size_mb = 8

            [access]
            allowed_role_id = 1376841148336836608
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.max_file_size_mb, 8);
        assert_eq!(config.storage.retention_hours, 24);
        assert_eq!(config.access.allowed_role_id, Some(1376841148336836608));
        assert_eq!(config.access.allowed_role_name, "RobloxDev");
    }

    #[test]
    fn full_document_parses() {
        let config: BrickbotConfig = toml::from_str(
            r#"
            [discord]
            token = "abc"
            prefix = "?"

            [database]
            url = "sqlite::memory:"

            [storage]
            upload_dir = "/tmp/uploads"
            retention_hours = 6
            cleanup_interval_secs = 60

            [publish]
            delay_secs = 0

            [sentry]
            dsn = "https://example.invalid/1"
            "#,
        )
        .unwrap();
        assert_eq!(config.discord.token, "abc");
        assert_eq!(config.discord.prefix, "?");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.storage.upload_dir, "/tmp/uploads");
        assert_eq!(config.storage.retention_hours, 6);
        assert_eq!(config.publish.delay_secs, 0);
        assert_eq!(config.sentry.dsn, "https://example.invalid/1");
    }
}
