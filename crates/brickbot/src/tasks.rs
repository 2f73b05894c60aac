use brickbot_db::DatabaseConnection;
use brickbot_files::FileStore;
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct CleanupReport {
    pub records_removed: usize,
    pub orphans_removed: usize,
    pub bytes_freed: u64,
}

/// Remove every upload whose record is older than `max_age_hours`,
/// together with its stored file, then sweep stored files past the same
/// age that no record claims (interrupted uploads, records pruned
/// elsewhere).
pub async fn cleanup_uploads(
    db: &DatabaseConnection,
    store: &FileStore,
    max_age_hours: u64,
) -> Result<CleanupReport, crate::Error> {
    let cutoff = Utc::now() - ChronoDuration::hours(max_age_hours as i64);
    info!("Starting cleanup of uploads older than {}h", max_age_hours);

    let mut report = CleanupReport::default();

    for rec in brickbot_db::uploads_older_than(db, cutoff).await? {
        match store.remove(&rec.stored_name).await {
            Ok(()) => report.bytes_freed += rec.size_bytes.max(0) as u64,
            Err(e) => warn!("Failed to delete stored file {}: {}", rec.stored_name, e),
        }
        brickbot_db::delete_upload(db, &rec.id).await?;
        report.records_removed += 1;
        info!("Removed expired upload {} ({})", rec.id, rec.original_name);
    }

    let max_age = Duration::from_secs(max_age_hours * 3600);
    for orphan in store.remove_older_than(max_age).await? {
        report.orphans_removed += 1;
        report.bytes_freed += orphan.size;
        info!("Removed orphaned file {}", orphan.name);
    }

    info!(
        "Cleanup complete: {} records, {} orphans, {} bytes freed",
        report.records_removed, report.orphans_removed, report.bytes_freed
    );
    Ok(report)
}

/// Periodic cleanup with the configured retention. Failures are logged
/// and the loop keeps going.
pub fn start_cleanup_task(
    db: &'static DatabaseConnection,
    store: FileStore,
    interval_secs: u64,
    retention_hours: u64,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            interval.tick().await;

            match cleanup_uploads(db, &store, retention_hours).await {
                Ok(report) => {
                    info!(
                        "Background cleanup removed {} records and {} orphans",
                        report.records_removed, report.orphans_removed
                    );
                }
                Err(e) => {
                    error!("Background cleanup failed: {}", e);
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickbot_db::{Database, UploadRecord};
    use brickbot_migrations::{Migrator, MigratorTrait};
    use tempfile::tempdir;

    async fn test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn record(id: &str, hours_ago: i64) -> UploadRecord {
        UploadRecord {
            id: id.to_string(),
            original_name: format!("{}.rbxl", id),
            stored_name: format!("{}.rbxl", id),
            size_bytes: 4,
            kind: "rbxl".to_string(),
            place_name: None,
            uploader_id: 7,
            uploaded_at: Utc::now() - ChronoDuration::hours(hours_ago),
        }
    }

    #[tokio::test]
    async fn removes_expired_and_spares_recent_uploads() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let db = test_db().await;

        brickbot_db::insert_upload(&db, record("old1", 48)).await.unwrap();
        brickbot_db::insert_upload(&db, record("new1", 1)).await.unwrap();
        store.save("old1.rbxl", b"aaaa").await.unwrap();
        store.save("new1.rbxl", b"bbbb").await.unwrap();

        let report = cleanup_uploads(&db, &store, 24).await.unwrap();

        assert_eq!(report.records_removed, 1);
        assert_eq!(report.bytes_freed, 4);
        assert!(brickbot_db::get_upload(&db, "old1").await.is_none());
        assert!(brickbot_db::get_upload(&db, "new1").await.is_some());
        assert!(!store.exists("old1.rbxl").await);
        assert!(store.exists("new1.rbxl").await);
    }

    #[tokio::test]
    async fn missing_file_still_drops_the_record() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let db = test_db().await;

        // Record whose file is already gone
        brickbot_db::insert_upload(&db, record("ghost", 48)).await.unwrap();

        let report = cleanup_uploads(&db, &store, 24).await.unwrap();
        assert_eq!(report.records_removed, 1);
        assert_eq!(report.bytes_freed, 0);
        assert!(brickbot_db::get_upload(&db, "ghost").await.is_none());
    }

    #[tokio::test]
    async fn zero_hours_sweeps_records_and_orphans() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let db = test_db().await;

        brickbot_db::insert_upload(&db, record("a", 1)).await.unwrap();
        store.save("a.rbxl", b"aaaa").await.unwrap();
        // No record for this one
        store.save("stray.rbxl", b"cc").await.unwrap();

        let report = cleanup_uploads(&db, &store, 0).await.unwrap();

        assert_eq!(report.records_removed, 1);
        assert_eq!(report.orphans_removed, 1);
        assert_eq!(report.bytes_freed, 6);
        assert_eq!(brickbot_db::count_uploads(&db).await.unwrap(), 0);
        assert_eq!(store.stats().await.unwrap().file_count, 0);
    }
}
