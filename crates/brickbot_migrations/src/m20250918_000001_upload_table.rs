use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Upload::Table)
                    .if_not_exists()
                    .col(string_uniq(Upload::Id).primary_key())
                    .col(string(Upload::OriginalName))
                    .col(string(Upload::StoredName))
                    .col(big_integer(Upload::SizeBytes))
                    .col(string(Upload::Kind))
                    .col(string_null(Upload::PlaceName))
                    .col(big_integer(Upload::UploaderId))
                    .col(timestamp(Upload::UploadedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Upload::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Upload {
    Table,
    Id,
    OriginalName,
    StoredName,
    SizeBytes,
    Kind,
    PlaceName,
    UploaderId,
    UploadedAt,
}
