use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;
use uuid::Uuid;

/// Result of a mocked publish. Fabricated at call time, shown to the
/// user, never persisted. No request ever leaves the process.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    pub place_id: String,
    pub universe_id: String,
    pub game_url: String,
    pub visibility: &'static str,
    pub published_at: DateTime<Utc>,
}

fn short_hex(len: usize) -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(len);
    hex
}

/// Pretend to publish an uploaded place. The delay stands in for the
/// upload-and-publish round trips of the real flow.
pub async fn mock_publish(delay: Duration, file_id: &str) -> PublishReceipt {
    sleep(delay).await;

    let place_id = format!("place_{}", short_hex(10));
    let receipt = PublishReceipt {
        game_url: format!("https://www.roblox.com/games/mock_{}", short_hex(12)),
        universe_id: format!("universe_{}", short_hex(8)),
        place_id,
        visibility: "private",
        published_at: Utc::now(),
    };
    info!(
        "Mock published file {} as {} ({})",
        file_id, receipt.place_id, receipt.game_url
    );
    receipt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn receipt_has_fabricated_shape() {
        let receipt = mock_publish(Duration::ZERO, "abc123").await;
        assert!(receipt.place_id.starts_with("place_"));
        assert_eq!(receipt.place_id.len(), "place_".len() + 10);
        assert!(receipt.universe_id.starts_with("universe_"));
        assert!(receipt.game_url.starts_with("https://www.roblox.com/games/mock_"));
        assert_eq!(receipt.visibility, "private");
    }

    #[tokio::test]
    async fn receipts_are_distinct_across_calls() {
        let a = mock_publish(Duration::ZERO, "abc123").await;
        let b = mock_publish(Duration::ZERO, "abc123").await;
        assert_ne!(a.place_id, b.place_id);
        assert_ne!(a.game_url, b.game_url);
    }
}
