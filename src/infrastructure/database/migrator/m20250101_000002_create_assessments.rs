//! Create assessments table

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assessments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assessments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assessments::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Assessments::CustomerName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::IsNewCustomer)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::CreditHistory)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::IncomeStability)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assessments::Location).integer().not_null())
                    .col(
                        ColumnDef::new(Assessments::BankingAccess)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assessments::Referral).integer().not_null())
                    .col(
                        ColumnDef::new(Assessments::CreditScore)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::RiskCategory)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::RecommendedProducts)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assessments_user_id")
                            .from(Assessments::Table, Assessments::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on created_at for date-range listing and export
        manager
            .create_index(
                Index::create()
                    .name("idx_assessments_created_at")
                    .table(Assessments::Table)
                    .col(Assessments::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assessments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Assessments {
    Table,
    Id,
    UserId,
    CustomerName,
    IsNewCustomer,
    CreditHistory,
    IncomeStability,
    Location,
    BankingAccess,
    Referral,
    CreditScore,
    RiskCategory,
    RecommendedProducts,
    CreatedAt,
}
