//! # 태그 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/tags | `list_tags` | 내 태그 목록 (`?assigned_only=1` 지원) |
//! | POST | /api/v1/tags | `create_tag` | 새 태그 생성 (201) |
//!
//! ## Axum 핸들러 패턴
//! - `State(state)`: 애플리케이션 공유 상태 (DB 풀 등)
//! - `auth_user`: 토큰에서 꺼낸 호출자. 모든 쿼리는 이 사용자로 범위가 제한됩니다.
//! - `ValidatedQuery(filter)`: 쿼리스트링 파싱 (실패 시 400 JSON)
//! - `ValidatedJson(req)`: 요청 본문 파싱 + 필드 검증

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

/// 내 태그 목록을 조회합니다.
///
/// `GET /api/v1/tags?assigned_only=1` → `{ "tags": [...] }`
pub async fn list_tags(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<AssignedFilter>,
) -> Result<Json<Value>, AppError> {
    let tags = db::list_tags(&state.pool, &auth_user.user_id, filter.enabled()).await?;
    Ok(Json(json!({ "tags": tags })))
}

/// 새 태그를 생성합니다.
///
/// `POST /api/v1/tags` + `{ "name": "..." }` → 201
pub async fn create_tag(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    let tag = db::create_tag(&state.pool, &auth_user.user_id, &req.name).await?;
    tracing::debug!(tag_id = %tag.id, "Tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}
