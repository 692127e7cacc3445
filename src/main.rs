//! # Recipe API 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 (준비될 때까지 재시도)
//! 4. 데이터베이스 마이그레이션 실행
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작

// ── 모듈 선언 ──
// `mod config;`는 같은 디렉토리의 `config.rs` 또는 `config/mod.rs`를 가져옵니다.
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;

use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use axum::Router;
use config::Config;
use db::LinkPolicy;
use routes::AppState;
use tower_http::{
    cors::{Any, CorsLayer}, // CORS(Cross-Origin Resource Sharing) 설정
    trace::TraceLayer,      // HTTP 요청/응답 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .ok(): .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG 환경변수가 없으면 recipe_api, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_api=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting Recipe API server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    // DB 파일이 늦게 마운트되는 환경(컨테이너 등)을 위해 1초 간격으로 재시도합니다.
    let pool = db::connect(&config.database_url, config.db_connect_attempts).await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    // sqlx::migrate!는 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 포함시키는 매크로
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    let link_policy = LinkPolicy::from_flag(config.recipe_links_same_owner);
    if link_policy == LinkPolicy::SameOwner {
        tracing::info!("Recipes may only link tags/ingredients of the same owner");
    }
    let state = AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
        token_ttl_minutes: config.token_ttl_minutes,
        link_policy,
    };

    // ── 7단계: 라우터 + 미들웨어 ──
    // 개발 환경 기준으로 모든 출처/메서드/헤더를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // .nest(): API 라우트를 /api/v1 경로 아래에 중첩시킵니다.
        // 예: /recipes → /api/v1/recipes
        .nest("/api/v1", routes::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 8단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
