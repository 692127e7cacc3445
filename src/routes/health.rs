//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok" }`
//!
//! 인증 없이 호출할 수 있으며, 컨테이너 헬스체크나 로드밸런서의 상태 확인에 씁니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /health`: 서버가 요청을 받을 수 있는지만 확인합니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}
