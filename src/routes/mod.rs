//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `users`: 회원가입, 토큰 발급, 내 정보 조회/수정
//! - `tags`, `ingredients`: 사용자별 라벨 목록/생성
//! - `recipes`: 레시피 CRUD
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

// 각 모듈의 핸들러 함수들을 재공개하여
// `routes::list_tags`처럼 바로 접근 가능하게 합니다.
pub use health::*;
pub use ingredients::*;
pub use recipes::*;
pub use tags::*;
pub use users::*;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

use crate::{db::LinkPolicy, error::AppError};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 발급 토큰 유효 시간(분)
    pub token_ttl_minutes: i64,
    /// 레시피가 연결할 수 있는 태그/재료 범위
    pub link_policy: LinkPolicy,
}

/// `/api/v1` 아래에 중첩될 API 라우터를 만듭니다.
///
/// 경로는 있는데 메서드가 맞지 않으면 `method_not_allowed`(405),
/// 경로 자체가 없으면 `route_not_found`(404)로 표준 에러 본문을 돌려줍니다.
pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/user/create", post(create_user).fallback(method_not_allowed))
        .route("/user/token", post(issue_token).fallback(method_not_allowed))
        .route(
            "/user/me",
            get(me)
                .patch(update_me)
                .put(replace_me)
                .fallback(method_not_allowed),
        );

    Router::new()
        .merge(user_routes)
        .route(
            "/ingredients",
            get(list_ingredients)
                .post(create_ingredient)
                .fallback(method_not_allowed),
        )
        .route(
            "/tags",
            get(list_tags).post(create_tag).fallback(method_not_allowed),
        )
        .route(
            "/recipes",
            get(list_recipes)
                .post(create_recipe)
                .fallback(method_not_allowed),
        )
        // axum 0.8부터 경로 파라미터는 `{id}` 문법
        .route(
            "/recipes/{id}",
            get(get_recipe)
                .patch(update_recipe)
                .put(replace_recipe)
                .fallback(method_not_allowed),
        )
        .route("/health", get(health_check).fallback(method_not_allowed))
        .fallback(route_not_found)
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::NotFound
}

/// 테스트용 상태: 인메모리 DB + 고정 비밀키
#[cfg(test)]
pub async fn test_state() -> AppState {
    AppState {
        pool: crate::db::test_pool().await,
        jwt_secret: "test-secret".to_string(),
        token_ttl_minutes: 60,
        link_policy: LinkPolicy::AnyOwner,
    }
}
