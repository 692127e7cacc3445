//! # 레시피 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 응답 |
//! |--------|------|--------|------|
//! | GET | /api/v1/recipes | `list_recipes` | `{ "recipes": [요약...] }` |
//! | POST | /api/v1/recipes | `create_recipe` | 201 + 요약 |
//! | GET | /api/v1/recipes/{id} | `get_recipe` | 상세 (태그/재료 객체 포함) |
//! | PATCH | /api/v1/recipes/{id} | `update_recipe` | 요약 |
//! | PUT | /api/v1/recipes/{id} | `replace_recipe` | 요약 |
//!
//! 다른 사용자의 레시피 id는 존재하지 않는 id와 똑같이 404입니다.

use crate::{
    db,
    error::AppError,
    middleware::{auth::AuthUser, validate::ValidatedJson},
    models::*,
    routes::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `GET /api/v1/recipes`: 최신순
pub async fn list_recipes(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let recipes = db::list_recipes(&state.pool, &auth_user.user_id).await?;
    Ok(Json(json!({ "recipes": recipes })))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<RecipeDetail>, AppError> {
    let recipe = db::get_recipe(&state.pool, &auth_user.user_id, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(recipe))
}

/// `POST /api/v1/recipes`
///
/// `tags`/`ingredients`에 없는 id가 있으면 400이고 레시피는 만들어지지 않습니다.
pub async fn create_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeSummary>), AppError> {
    let recipe =
        db::create_recipe(&state.pool, &auth_user.user_id, &req, state.link_policy).await?;
    tracing::info!(recipe_id = %recipe.id, user_id = %auth_user.user_id, "Recipe created");
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// `PATCH /api/v1/recipes/{id}`: 보낸 필드만 변경
pub async fn update_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<RecipePatchRequest>,
) -> Result<Json<RecipeSummary>, AppError> {
    let recipe = db::update_recipe_partial(
        &state.pool,
        &auth_user.user_id,
        &id,
        &patch,
        state.link_policy,
    )
    .await?
    .ok_or(AppError::NotFound)?;
    Ok(Json(recipe))
}

/// `PUT /api/v1/recipes/{id}`: 전체 교체. 생략된 태그/재료는 모두 해제됩니다.
pub async fn replace_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<RecipeRequest>,
) -> Result<Json<RecipeSummary>, AppError> {
    let recipe =
        db::update_recipe_full(&state.pool, &auth_user.user_id, &id, req, state.link_policy)
            .await?
            .ok_or(AppError::NotFound)?;
    Ok(Json(recipe))
}
