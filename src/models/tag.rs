//! # 태그 모델 정의
//!
//! 태그는 레시피를 분류하는 사용자별 라벨입니다.
//! 같은 사용자 안에서도 이름 중복을 허용하며, id로 구분합니다.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 태그 엔티티: DB의 `tags` 테이블 한 행(row)에 대응합니다.
///
/// 소유자(`user_id`)는 조회 조건으로만 쓰이고 응답에는 포함하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// 태그 고유 식별자 (UUIDv7 형식 문자열)
    pub id: String,
    /// 태그 이름 (예: "Vegan", "Dessert")
    pub name: String,
}

/// 태그 생성 요청: `POST /api/v1/tags`의 요청 본문에 해당합니다.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    /// 생성할 태그 이름 (필수, 빈 문자열 불가)
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub name: String,
}
