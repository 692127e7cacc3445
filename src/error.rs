//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 응답 본문 형식:
//! `{ "error": { "code": "...", "message": "...", "fields": { "<필드>": ["..."] } } }`
//! (`fields`는 검증 실패일 때만 포함됩니다)

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// 검증에 실패한 필드 하나와 그 사유
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    /// 다른 사용자의 리소스도 "없는 것"으로 취급합니다.
    #[error("Resource not found")]
    NotFound,

    /// 본문 파싱 실패 등 형식이 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 필드 단위 검증 실패 (HTTP 400)
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// 지원하지 않는 HTTP 메서드 (HTTP 405)
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수의 에러에 `?`를 쓰면 자동으로 이 variant로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// 필드 하나에 대한 검증 에러를 만듭니다.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldError {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code)),
                })
            })
            .collect();
        // HashMap 순회 순서를 고정
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

impl IntoResponse for AppError {
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Validation(ref errors) => {
                let mut fields: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
                for e in errors {
                    fields.entry(e.field.as_str()).or_default().push(e.message.as_str());
                }
                let body = Json(json!({
                    "error": {
                        "code": "validation_error",
                        "message": "Request validation failed",
                        "fields": fields
                    }
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed",
                self.to_string(),
            ),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
