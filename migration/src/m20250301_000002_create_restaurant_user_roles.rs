use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_restaurants::Restaurants;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RestaurantUserRoles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RestaurantUserRoles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RestaurantUserRoles::RestaurantId).big_integer().not_null())
                    .col(ColumnDef::new(RestaurantUserRoles::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(RestaurantUserRoles::Role)
                            .string_len(32)
                            .not_null()
                            .default("staff"),
                    )
                    .col(
                        ColumnDef::new(RestaurantUserRoles::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(RestaurantUserRoles::ExpiresAt).big_integer().null())
                    .col(ColumnDef::new(RestaurantUserRoles::AssignedBy).big_integer().null())
                    .col(ColumnDef::new(RestaurantUserRoles::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(RestaurantUserRoles::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(RestaurantUserRoles::DeletedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_user_roles_restaurant_id")
                            .from(RestaurantUserRoles::Table, RestaurantUserRoles::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One assignment row per (restaurant, user) pair
        manager
            .create_index(
                Index::create()
                    .name("uq_restaurant_user_roles_restaurant_user")
                    .table(RestaurantUserRoles::Table)
                    .col(RestaurantUserRoles::RestaurantId)
                    .col(RestaurantUserRoles::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_user_roles_user_active")
                    .table(RestaurantUserRoles::Table)
                    .col(RestaurantUserRoles::UserId)
                    .col(RestaurantUserRoles::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RestaurantUserRoles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RestaurantUserRoles {
    Table,
    Id,
    RestaurantId,
    UserId,
    Role,
    IsActive,
    ExpiresAt,
    AssignedBy,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
