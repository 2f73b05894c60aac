use sea_orm::ConnectOptions;
use brickbot_migrations::{Migrator, MigratorTrait};
use tokio::sync::OnceCell;
use crate::entities::prelude::*;
use sea_orm::*;
use chrono::{DateTime, Utc};

pub use sea_orm::{Database, DatabaseConnection, DbErr};

static DB_CLIENT: OnceCell<DatabaseConnection> = OnceCell::const_new();

pub mod entities;

pub async fn init_db(database_url: &str) {
    let opt = ConnectOptions::new(database_url);
    let db = Database::connect(opt).await.unwrap();
    DB_CLIENT
        .set(db)
        .unwrap_or_else(|_| panic!("don't call `init_db()` more than once"));

    Migrator::up(get_db().await, None).await.unwrap();
}

pub async fn get_db() -> &'static DatabaseConnection {
    DB_CLIENT
        .get()
        .expect("called `get_db()` before db was initialized")
}

/// An uploaded place file as tracked in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub id: String,
    pub original_name: String,
    pub stored_name: String,
    pub size_bytes: i64,
    pub kind: String,
    pub place_name: Option<String>,
    pub uploader_id: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<entities::upload::Model> for UploadRecord {
    fn from(m: entities::upload::Model) -> Self {
        UploadRecord {
            id: m.id,
            original_name: m.original_name,
            stored_name: m.stored_name,
            size_bytes: m.size_bytes,
            kind: m.kind,
            place_name: m.place_name,
            uploader_id: m.uploader_id,
            uploaded_at: m.uploaded_at,
        }
    }
}

pub async fn insert_upload(db: &DatabaseConnection, rec: UploadRecord) -> Result<(), DbErr> {
    let am = entities::upload::ActiveModel {
        id: ActiveValue::set(rec.id),
        original_name: ActiveValue::set(rec.original_name),
        stored_name: ActiveValue::set(rec.stored_name),
        size_bytes: ActiveValue::set(rec.size_bytes),
        kind: ActiveValue::set(rec.kind),
        place_name: ActiveValue::set(rec.place_name),
        uploader_id: ActiveValue::set(rec.uploader_id),
        uploaded_at: ActiveValue::set(rec.uploaded_at),
    };
    Upload::insert(am).exec(db).await.map(|_| ())
}

/// Fetch an upload by its file id. Returns None if unknown or on error.
pub async fn get_upload(db: &DatabaseConnection, id: &str) -> Option<UploadRecord> {
    if let Ok(Some(model)) = Upload::find_by_id(id).one(db).await {
        Some(model.into())
    } else {
        None
    }
}

pub async fn delete_upload(db: &DatabaseConnection, id: &str) -> Result<u64, DbErr> {
    let res = Upload::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}

pub async fn count_uploads(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let count = Upload::find().count(db).await?;
    Ok(count)
}

/// Sum of the recorded sizes of all uploads, in bytes.
pub async fn total_upload_bytes(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let stmt = Statement::from_string(
        db.get_database_backend(),
        "SELECT COALESCE(SUM(size_bytes), 0) AS total FROM upload",
    );
    let row = db.query_one(stmt).await?;
    let total: i64 = match row {
        Some(row) => row.try_get("", "total").unwrap_or_default(),
        None => 0,
    };
    Ok(total.max(0) as u64)
}

/// Uploads whose recorded upload time is before `cutoff`.
pub async fn uploads_older_than(
    db: &DatabaseConnection,
    cutoff: DateTime<Utc>,
) -> Result<Vec<UploadRecord>, DbErr> {
    let models = Upload::find()
        .filter(entities::upload::Column::UploadedAt.lt(cutoff))
        .all(db)
        .await?;
    Ok(models.into_iter().map(UploadRecord::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn record(id: &str, uploaded_at: DateTime<Utc>) -> UploadRecord {
        UploadRecord {
            id: id.to_string(),
            original_name: format!("{}.rbxl", id),
            stored_name: format!("{}.rbxl", id),
            size_bytes: 1024,
            kind: "rbxl".to_string(),
            place_name: None,
            uploader_id: 42,
            uploaded_at,
        }
    }

    #[tokio::test]
    async fn insert_then_get_roundtrips() {
        let db = test_db().await;
        let rec = UploadRecord {
            place_name: Some("Obby of Doom".to_string()),
            ..record("abc123def456", Utc::now())
        };
        insert_upload(&db, rec.clone()).await.unwrap();

        let got = get_upload(&db, "abc123def456").await.unwrap();
        assert_eq!(got, rec);
        assert!(get_upload(&db, "nope").await.is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let db = test_db().await;
        insert_upload(&db, record("abc", Utc::now())).await.unwrap();

        assert_eq!(delete_upload(&db, "abc").await.unwrap(), 1);
        assert!(get_upload(&db, "abc").await.is_none());
        assert_eq!(delete_upload(&db, "abc").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn count_and_total_bytes() {
        let db = test_db().await;
        assert_eq!(count_uploads(&db).await.unwrap(), 0);
        assert_eq!(total_upload_bytes(&db).await.unwrap(), 0);

        insert_upload(&db, record("a", Utc::now())).await.unwrap();
        insert_upload(&db, record("b", Utc::now())).await.unwrap();

        assert_eq!(count_uploads(&db).await.unwrap(), 2);
        assert_eq!(total_upload_bytes(&db).await.unwrap(), 2048);
    }

    #[tokio::test]
    async fn older_than_filters_on_upload_time() {
        let db = test_db().await;
        let now = Utc::now();
        insert_upload(&db, record("old", now - Duration::hours(48)))
            .await
            .unwrap();
        insert_upload(&db, record("new", now)).await.unwrap();

        let cutoff = now - Duration::hours(24);
        let expired = uploads_older_than(&db, cutoff).await.unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, "old");
    }
}
