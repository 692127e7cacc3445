//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 사용자 소유 데이터를 다루는 모든 함수는 호출자의 사용자 id(`owner`)를
//! 명시적인 인자로 받고, 쿼리에 `user_id = owner` 조건을 항상 포함합니다.
//!
//! 각 하위 모듈:
//! - `labels`: 태그/재료가 공유하는 소유자 범위 조회, assigned-only 필터, 레시피 연결
//! - `tags`, `ingredients`: 라벨 종류별 CRUD
//! - `recipes`: 레시피 CRUD와 연결 집합 교체
//! - `users`: 사용자 계정 쿼리

pub mod ingredients;
pub mod labels;
pub mod recipes;
pub mod tags;
pub mod users;

pub use ingredients::*;
pub use labels::LinkPolicy;
pub use recipes::*;
pub use tags::*;

use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

/// SQLite 연결 풀을 만듭니다. DB가 아직 준비되지 않았으면 1초 간격으로
/// 최대 `attempts`번까지 다시 시도합니다.
pub async fn connect(database_url: &str, attempts: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut attempt = 1;
    loop {
        tracing::info!("Waiting for database... (attempt {}/{})", attempt, attempts);
        match SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options.clone())
            .await
        {
            Ok(pool) => {
                tracing::info!("Database available");
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                tracing::warn!("Database unavailable ({}), retrying in 1 second", e);
                tokio::time::sleep(Duration::from_secs(1)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// 테스트용 인메모리 DB. 연결이 하나뿐이므로 트랜잭션 중에는 풀을 다시 쓰면 안 됩니다.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations apply");
    pool
}

/// 테스트용 사용자를 만들고 id를 반환합니다.
#[cfg(test)]
pub async fn test_user(pool: &SqlitePool, email: &str) -> String {
    users::create_user(pool, email, "Test User", "not-a-real-hash")
        .await
        .expect("create test user")
        .id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_creates_and_opens_database() {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        let (one,): (i64,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }

    #[tokio::test]
    async fn connect_gives_up_after_last_attempt() {
        let result = connect("sqlite:/nonexistent-dir/for/sure/app.db", 2).await;
        assert!(result.is_err());
    }
}
