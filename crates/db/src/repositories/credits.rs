//! Credits ledger repository.
//!
//! Implements the account store integration for the usage ledger: lazy
//! account creation, persisted window resets, the advisory quota check, the
//! atomic deduction, and the administrative overrides. Per-account rows are
//! never locked in-process; all mutations go through single-statement
//! conditional or arithmetic updates so concurrent spends against the same
//! account cannot overdraw it.

use chrono::{Local, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, sea_query::Expr,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use hireflow_core::credits::{
    AccountSnapshot, AccountStanding, CreditDecision, CreditError, CreditStatus, DAILY_LIMIT,
    DenialReason, MONTHLY_LIMIT, OperationKind, QuotaEvaluator, SIGNUP_BONUS, SpendOutcome, window,
};

use crate::entities::credit_accounts;

/// Errors from ledger persistence operations.
#[derive(Debug, Error)]
pub enum CreditsError {
    /// The account row could not be read back or recreated mid-operation.
    ///
    /// Requires operator attention; the account is unusable until repaired.
    #[error("credit account for user {0} is unavailable")]
    AccountUnavailable(Uuid),

    /// Invalid administrative input.
    #[error(transparent)]
    Validation(#[from] CreditError),

    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for credit ledger operations.
#[derive(Debug, Clone)]
pub struct CreditsRepository {
    db: DatabaseConnection,
}

impl CreditsRepository {
    /// Creates a new credits repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an account by its owning user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<credit_accounts::Model>, DbErr> {
        credit_accounts::Entity::find()
            .filter(credit_accounts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Gets the user's account, creating it with the signup bonus if absent.
    ///
    /// Creation is idempotent under races: if a concurrent request inserts
    /// the row first, the unique index on `user_id` rejects ours and the
    /// winner's row is returned instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or insert fails.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<credit_accounts::Model, DbErr> {
        if let Some(account) = self.find_by_user(user_id).await? {
            return Ok(account);
        }

        let now = Utc::now().into();
        let account = credit_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            balance: Set(SIGNUP_BONUS),
            daily_used: Set(0),
            monthly_used: Set(0),
            last_daily_reset: Set(now),
            last_monthly_reset: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match account.insert(&self.db).await {
            Ok(model) => {
                info!(user_id = %user_id, balance = SIGNUP_BONUS, "Created credit account");
                Ok(model)
            }
            Err(insert_err) => match self.find_by_user(user_id).await? {
                // Lost the creation race; the winner's row is authoritative
                Some(model) => Ok(model),
                None => Err(insert_err),
            },
        }
    }

    /// Zeroes stale usage counters, persisting the reset before returning.
    ///
    /// The daily and monthly windows reset independently; when both are
    /// stale they are zeroed in one durable update. Applying this twice in
    /// succession performs the reset once.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn apply_window_resets(
        &self,
        account: credit_accounts::Model,
    ) -> Result<credit_accounts::Model, DbErr> {
        let now_local = Local::now();
        let reset_daily = window::needs_daily_reset(
            &account.last_daily_reset.with_timezone(&Local),
            &now_local,
        );
        let reset_monthly = window::needs_monthly_reset(
            &account.last_monthly_reset.with_timezone(&Local),
            &now_local,
        );

        if !reset_daily && !reset_monthly {
            return Ok(account);
        }

        let now = now_local.fixed_offset();
        let mut update = credit_accounts::Entity::update_many()
            .col_expr(credit_accounts::Column::UpdatedAt, Expr::value(now))
            .filter(credit_accounts::Column::Id.eq(account.id));

        if reset_daily {
            update = update
                .col_expr(credit_accounts::Column::DailyUsed, Expr::value(0_i64))
                .col_expr(credit_accounts::Column::LastDailyReset, Expr::value(now));
        }
        if reset_monthly {
            update = update
                .col_expr(credit_accounts::Column::MonthlyUsed, Expr::value(0_i64))
                .col_expr(credit_accounts::Column::LastMonthlyReset, Expr::value(now));
        }

        update.exec(&self.db).await?;

        debug!(
            user_id = %account.user_id,
            reset_daily,
            reset_monthly,
            "Reset usage windows"
        );

        let mut account = account;
        if reset_daily {
            account.daily_used = 0;
            account.last_daily_reset = now;
        }
        if reset_monthly {
            account.monthly_used = 0;
            account.last_monthly_reset = now;
        }
        account.updated_at = now;

        Ok(account)
    }

    /// Advisory quota check: decides whether `kind` may currently be spent.
    ///
    /// Brings the windows current first (persisted), then evaluates. Performs
    /// no deduction; the answer can be stale by the time `spend` runs, which
    /// `spend` guards against on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or update fails.
    pub async fn check(
        &self,
        user_id: Uuid,
        kind: OperationKind,
    ) -> Result<CreditDecision, DbErr> {
        let account = self.get_or_create(user_id).await?;
        let account = self.apply_window_resets(account).await?;

        let decision = QuotaEvaluator::evaluate(&Self::snapshot(&account), kind);
        if !decision.allowed {
            warn!(
                user_id = %user_id,
                operation = %kind,
                reason = decision.reason.map(DenialReason::code),
                "Credit check denied"
            );
        }

        Ok(decision)
    }

    /// Reads the account status, bringing the windows current as a side
    /// effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or update fails.
    pub async fn status(&self, user_id: Uuid) -> Result<CreditStatus, DbErr> {
        let account = self.get_or_create(user_id).await?;
        let account = self.apply_window_resets(account).await?;

        Ok(CreditStatus::of(&Self::snapshot(&account)))
    }

    /// Deducts the cost of `kind` from the user's account.
    ///
    /// The insufficiency check and the write are one conditional update:
    /// the decrement only applies while the balance covers the cost and both
    /// caps have headroom, so a losing racer is denied instead of
    /// overdrawing the account. A denial is reported the same way whether it
    /// was evident at check time or only materialized here.
    ///
    /// # Errors
    ///
    /// Returns `CreditsError::AccountUnavailable` if the account row
    /// vanished and could not be recreated within one retry, or a database
    /// error for any other store failure. Neither implies the deduction was
    /// applied; callers must re-query `status` rather than assume.
    pub async fn spend(
        &self,
        user_id: Uuid,
        kind: OperationKind,
    ) -> Result<SpendOutcome, CreditsError> {
        let cost = kind.cost();
        let account = self.get_or_create(user_id).await?;
        self.apply_window_resets(account).await?;

        for attempt in 0..2 {
            let rows_affected = self.deduct(user_id, cost).await?;
            if rows_affected == 1 {
                debug!(user_id = %user_id, operation = %kind, cost, "Spent credits");
                return Ok(SpendOutcome::applied());
            }

            // The guard failed; classify from a fresh read.
            match self.find_by_user(user_id).await? {
                Some(current) => {
                    let decision = QuotaEvaluator::evaluate(&Self::snapshot(&current), kind);
                    // A losing racer whose funds reappeared before the re-read
                    // still reports like an ordinary insufficiency.
                    let reason = decision
                        .reason
                        .unwrap_or(DenialReason::InsufficientBalance);
                    warn!(
                        user_id = %user_id,
                        operation = %kind,
                        reason = reason.code(),
                        balance = current.balance,
                        "Spend denied"
                    );
                    return Ok(SpendOutcome::denied(reason));
                }
                None if attempt == 0 => {
                    warn!(user_id = %user_id, "Credit account missing during spend, recreating");
                    self.get_or_create(user_id).await?;
                }
                None => break,
            }
        }

        error!(user_id = %user_id, "Credit account unavailable after retry");
        Err(CreditsError::AccountUnavailable(user_id))
    }

    /// Grants `amount` credits to the user, creating the account if absent.
    ///
    /// Bypasses the quota caps by design; usage counters and reset
    /// timestamps are untouched.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive amount, or a database
    /// error if the update fails.
    pub async fn grant(
        &self,
        user_id: Uuid,
        amount: i64,
    ) -> Result<credit_accounts::Model, CreditsError> {
        if amount <= 0 {
            return Err(CreditError::NonPositiveGrant(amount).into());
        }

        self.get_or_create(user_id).await?;

        credit_accounts::Entity::update_many()
            .col_expr(
                credit_accounts::Column::Balance,
                Expr::col(credit_accounts::Column::Balance).add(amount),
            )
            .col_expr(
                credit_accounts::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(credit_accounts::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        info!(user_id = %user_id, amount, "Granted credits");

        self.find_by_user(user_id)
            .await?
            .ok_or(CreditsError::AccountUnavailable(user_id))
    }

    /// Overwrites the user's balance, creating the account if absent.
    ///
    /// Usage counters and reset timestamps are untouched.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a negative amount, or a database error
    /// if the update fails.
    pub async fn set_balance(
        &self,
        user_id: Uuid,
        amount: i64,
    ) -> Result<credit_accounts::Model, CreditsError> {
        if amount < 0 {
            return Err(CreditError::NegativeBalance(amount).into());
        }

        self.get_or_create(user_id).await?;

        credit_accounts::Entity::update_many()
            .col_expr(credit_accounts::Column::Balance, Expr::value(amount))
            .col_expr(
                credit_accounts::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(credit_accounts::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        info!(user_id = %user_id, amount, "Set credit balance");

        self.find_by_user(user_id)
            .await?
            .ok_or(CreditsError::AccountUnavailable(user_id))
    }

    /// Lists all accounts by descending balance with status fields attached.
    ///
    /// Stale windows are reported as zero used without being persisted; this
    /// is a read-only reporting view and must not write one row per account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ranking(&self) -> Result<Vec<AccountStanding>, DbErr> {
        let accounts = credit_accounts::Entity::find()
            .order_by_desc(credit_accounts::Column::Balance)
            .all(&self.db)
            .await?;

        let now_local = Local::now();
        Ok(accounts
            .into_iter()
            .map(|account| {
                let mut snapshot = Self::snapshot(&account);
                if window::needs_daily_reset(
                    &account.last_daily_reset.with_timezone(&Local),
                    &now_local,
                ) {
                    snapshot.daily_used = 0;
                }
                if window::needs_monthly_reset(
                    &account.last_monthly_reset.with_timezone(&Local),
                    &now_local,
                ) {
                    snapshot.monthly_used = 0;
                }
                AccountStanding {
                    user_id: account.user_id,
                    status: CreditStatus::of(&snapshot),
                }
            })
            .collect())
    }

    /// Single conditional atomic deduction.
    ///
    /// Returns the number of rows affected: 1 when the deduction applied,
    /// 0 when the balance or a cap guard rejected it (or the row is gone).
    async fn deduct(&self, user_id: Uuid, cost: i64) -> Result<u64, DbErr> {
        let result = credit_accounts::Entity::update_many()
            .col_expr(
                credit_accounts::Column::Balance,
                Expr::col(credit_accounts::Column::Balance).sub(cost),
            )
            .col_expr(
                credit_accounts::Column::DailyUsed,
                Expr::col(credit_accounts::Column::DailyUsed).add(cost),
            )
            .col_expr(
                credit_accounts::Column::MonthlyUsed,
                Expr::col(credit_accounts::Column::MonthlyUsed).add(cost),
            )
            .col_expr(
                credit_accounts::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(credit_accounts::Column::UserId.eq(user_id))
            .filter(credit_accounts::Column::Balance.gte(cost))
            .filter(credit_accounts::Column::DailyUsed.lte(DAILY_LIMIT - cost))
            .filter(credit_accounts::Column::MonthlyUsed.lte(MONTHLY_LIMIT - cost))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    fn snapshot(account: &credit_accounts::Model) -> AccountSnapshot {
        AccountSnapshot {
            balance: account.balance,
            daily_used: account.daily_used,
            monthly_used: account.monthly_used,
        }
    }
}
