use crate::error::AppError;
use crate::models::user::User;
use sqlx::SqlitePool;

/// `users.email`의 UNIQUE 위반을 `email` 필드 검증 에러로 바꿉니다.
///
/// 조회 후 삽입 방식은 동시 가입 사이에 틈이 생기므로 제약 조건 위반을 그대로 받아 변환합니다.
fn map_duplicate_email(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::validation("email", "user with this email already exists.")
        }
        other => other.into(),
    }
}

/// 새 사용자를 만듭니다. 이메일 중복은 `email` 필드의 검증 에러입니다.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, password_hash)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .execute(pool)
    .await
    .map_err(map_duplicate_email)?;

    find_by_id(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, password_hash, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, password_hash, created_at, updated_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// 주어진 필드만 바꾸고 갱신된 사용자를 반환합니다. `None`인 필드는 그대로 둡니다.
pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    email: Option<&str>,
    name: Option<&str>,
    password_hash: Option<&str>,
) -> Result<Option<User>, AppError> {
    sqlx::query(
        r#"
        UPDATE users
        SET email = COALESCE(?, email),
            name = COALESCE(?, name),
            password_hash = COALESCE(?, password_hash),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .bind(id)
    .execute(pool)
    .await
    .map_err(map_duplicate_email)?;

    find_by_id(pool, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn duplicate_email_is_a_validation_error() {
        let pool = test_pool().await;
        create_user(&pool, "test@example.com", "A", "h").await.unwrap();

        let err = create_user(&pool, "test@example.com", "B", "h").await.unwrap_err();
        match err {
            AppError::Validation(errors) => assert_eq!(errors[0].field, "email"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn concurrent_signups_with_same_email_yield_one_user() {
        let pool = test_pool().await;

        let (first, second) = tokio::join!(
            create_user(&pool, "race@example.com", "A", "h"),
            create_user(&pool, "race@example.com", "B", "h"),
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AppError::Validation(errors)) if errors[0].field == "email")));
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let pool = test_pool().await;
        let user = create_user(&pool, "test@example.com", "Old Name", "hash1").await.unwrap();

        let updated = update_user(&pool, &user.id, None, Some("New Name"), None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.email, "test@example.com");
        assert_eq!(updated.password_hash, "hash1");
    }

    #[tokio::test]
    async fn update_rejects_email_taken_by_someone_else() {
        let pool = test_pool().await;
        create_user(&pool, "taken@example.com", "A", "h").await.unwrap();
        let me = create_user(&pool, "me@example.com", "B", "h").await.unwrap();

        let result = update_user(&pool, &me.id, Some("taken@example.com"), None, None).await;
        match result {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors[0].field, "email");
                assert_eq!(errors[0].message, "user with this email already exists.");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        // 자기 이메일을 그대로 다시 보내는 것은 허용
        let same = update_user(&pool, &me.id, Some("me@example.com"), None, None).await;
        assert!(same.is_ok());
    }

    #[tokio::test]
    async fn update_of_missing_user_is_none() {
        let pool = test_pool().await;
        let result = update_user(&pool, "nobody", None, Some("x"), None).await.unwrap();
        assert!(result.is_none());
    }
}
