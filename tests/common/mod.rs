//! Helpers for integration tests.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use recipe_api::db::{DbPool, establish_connection_pool};
use recipe_api::domain::user::{NewUser, User};
use recipe_api::repository::{DieselRepository, UserWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

/// Insert a user with a placeholder password hash and a token derived from the email.
#[allow(dead_code)]
pub fn create_user(repo: &DieselRepository, email: &str) -> User {
    let token = format!("token-{email}");
    repo.create_user(&NewUser::new(email, "", "not-a-real-hash".to_string()), &token)
        .expect("create user")
}

/// Insert a user authenticated by `token`, returning the user id.
#[allow(dead_code)]
pub fn create_user_with_token(repo: &DieselRepository, email: &str, token: &str) -> i32 {
    repo.create_user(&NewUser::new(email, "", "not-a-real-hash".to_string()), token)
        .expect("create user")
        .id
}
