//! # 요청 추출기(Extractor) 모듈
//!
//! 핸들러 인자로 쓰이는 커스텀 추출기입니다.
//! - `auth`: `Authorization: Bearer` 헤더에서 사용자 식별 (`AuthUser`)
//! - `validate`: JSON 본문 파싱 + 필드 검증 (`ValidatedJson`)

pub mod auth;
pub mod validate;
