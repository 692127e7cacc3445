//! # 재료 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 핸들러 |
//! |--------|------|--------|
//! | GET | /api/v1/ingredients | `list_ingredients` |
//! | POST | /api/v1/ingredients | `create_ingredient` |

use crate::{
    db,
    error::AppError,
    middleware::{
        auth::AuthUser,
        validate::{ValidatedJson, ValidatedQuery},
    },
    models::*,
    routes::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list_ingredients(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<AssignedFilter>,
) -> Result<Json<Value>, AppError> {
    let ingredients =
        db::list_ingredients(&state.pool, &auth_user.user_id, filter.enabled()).await?;
    Ok(Json(json!({ "ingredients": ingredients })))
}

pub async fn create_ingredient(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateIngredientRequest>,
) -> Result<(StatusCode, Json<Ingredient>), AppError> {
    let ingredient = db::create_ingredient(&state.pool, &auth_user.user_id, &req.name).await?;
    tracing::debug!(ingredient_id = %ingredient.id, "Ingredient created");
    Ok((StatusCode::CREATED, Json(ingredient)))
}
