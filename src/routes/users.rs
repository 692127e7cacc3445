//! # 사용자 계정 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/v1/user/create | `create_user` | 회원가입 (201) |
//! | POST | /api/v1/user/token | `issue_token` | 이메일/비밀번호로 토큰 발급 |
//! | GET | /api/v1/user/me | `me` | 내 정보 |
//! | PATCH | /api/v1/user/me | `update_me` | 보낸 필드만 수정 |
//! | PUT | /api/v1/user/me | `replace_me` | 전체 수정 |
//!
//! `/user/me`에 다른 메서드(POST, DELETE 등)를 쓰면 `method_not_allowed`가 405를 반환합니다.

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::{
        auth::{create_token, AuthUser},
        validate::ValidatedJson,
    },
    models::user::*,
    routes::AppState,
};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, Json};
use rand_core::OsRng;

const BAD_CREDENTIALS: &str = "Unable to authenticate user with provided credentials";

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// 회원가입
///
/// `POST /api/v1/user/create` + `{ "email", "password", "name" }` → 201 `{ "email", "name" }`
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let email = normalize_email(&req.email);
    let password_hash = hash_password(&req.password)?;

    let user = db_users::create_user(&state.pool, &email, &req.name, &password_hash).await?;
    tracing::info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// 토큰 발급
///
/// 사용자가 없거나 비밀번호가 틀리면 둘을 구분하지 않고 같은 400 에러를 돌려줍니다.
pub async fn issue_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = normalize_email(&req.email);
    let user = db_users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::validation("non_field_errors", BAD_CREDENTIALS))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::validation("non_field_errors", BAD_CREDENTIALS))?;

    let token = create_token(&user.id, &state.jwt_secret, state.token_ttl_minutes)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    Ok(Json(TokenResponse { token }))
}

/// 내 정보
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user.into()))
}

/// PATCH: 보낸 필드만 바꿉니다. 비밀번호는 다시 해싱하여 저장합니다.
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    apply_update(&state, &auth_user.user_id, req).await
}

/// PUT: 세 필드 모두 필수
pub async fn replace_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    apply_update(&state, &auth_user.user_id, req.into()).await
}

async fn apply_update(
    state: &AppState,
    user_id: &str,
    req: UpdateUserRequest,
) -> Result<Json<UserResponse>, AppError> {
    let email = req.email.as_deref().map(normalize_email);
    let password_hash = match req.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let user = db_users::update_user(
        &state.pool,
        user_id,
        email.as_deref(),
        req.name.as_deref(),
        password_hash.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound)?;
    tracing::info!(user_id = %user.id, "User profile updated");

    Ok(Json(user.into()))
}

/// `/user/me`의 GET/PATCH/PUT 외 메서드
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
