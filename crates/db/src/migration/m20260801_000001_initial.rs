//! Initial database migration.
//!
//! Creates the users table (FK target for account ownership) and the
//! credit_accounts ledger table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CREDIT_ACCOUNTS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS credit_accounts CASCADE;\nDROP TABLE IF EXISTS users CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
-- Users table (identity itself is managed by the identity service)
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CREDIT_ACCOUNTS_SQL: &str = r"
-- Credit ledger: one row per user
CREATE TABLE credit_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    balance BIGINT NOT NULL DEFAULT 0,
    daily_used BIGINT NOT NULL DEFAULT 0,
    monthly_used BIGINT NOT NULL DEFAULT 0,
    last_daily_reset TIMESTAMPTZ NOT NULL DEFAULT now(),
    last_monthly_reset TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- Store-level backstop: a deduction may never leave the balance negative
    CONSTRAINT chk_balance_non_negative CHECK (balance >= 0),
    CONSTRAINT chk_daily_used_non_negative CHECK (daily_used >= 0),
    CONSTRAINT chk_monthly_used_non_negative CHECK (monthly_used >= 0)
);

-- Admin ranking reads all accounts ordered by balance
CREATE INDEX idx_credit_accounts_balance ON credit_accounts(balance DESC);
";
