//! `SeaORM` entity definitions.

pub mod credit_accounts;
pub mod users;
