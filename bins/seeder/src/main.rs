//! Database seeder for Hireflow development and testing.
//!
//! Seeds a demo user and an admin user, each with a credit account, for
//! local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use hireflow_db::CreditsRepository;
use hireflow_db::entities::users;

/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Admin user ID (consistent for all seeds)
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

/// Balance granted to the admin account for local experiments.
const ADMIN_SEED_BALANCE: i64 = 5000;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = hireflow_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo user...");
    seed_user(&db, demo_user_id(), "demo@hireflow.dev", "Demo User").await;

    println!("Seeding admin user...");
    seed_user(&db, admin_user_id(), "admin@hireflow.dev", "Admin User").await;

    println!("Seeding credit accounts...");
    seed_credit_accounts(&db).await;

    println!("Seeding complete!");
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

fn admin_user_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).unwrap()
}

async fn seed_user(db: &DatabaseConnection, id: Uuid, email: &str, full_name: &str) {
    if users::Entity::find_by_id(id)
        .one(db)
        .await
        .expect("Failed to query users")
        .is_some()
    {
        println!("  User {email} already exists, skipping");
        return;
    }

    let now = Utc::now().into();
    users::ActiveModel {
        id: Set(id),
        email: Set(email.to_string()),
        full_name: Set(full_name.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert user");
}

async fn seed_credit_accounts(db: &DatabaseConnection) {
    let repo = CreditsRepository::new(db.clone());

    // Demo user starts at the ordinary signup bonus.
    let demo = repo
        .get_or_create(demo_user_id())
        .await
        .expect("Failed to create demo credit account");
    println!("  Demo account balance: {}", demo.balance);

    // Admin account gets a generous balance for local experiments.
    let admin = repo
        .set_balance(admin_user_id(), ADMIN_SEED_BALANCE)
        .await
        .expect("Failed to seed admin credit account");
    println!("  Admin account balance: {}", admin.balance);
}
