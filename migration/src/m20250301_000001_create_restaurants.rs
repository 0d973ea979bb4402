use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurants::Name).string().not_null())
                    .col(ColumnDef::new(Restaurants::Slug).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Restaurants::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Restaurants::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Restaurants::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Restaurants::DeletedAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        // Soft-deleted rows are filtered on every lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurants_deleted_at")
                    .table(Restaurants::Table)
                    .col(Restaurants::DeletedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Restaurants {
    Table,
    Id,
    Name,
    Slug,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
