//! # 태그 데이터베이스 쿼리 모듈
//!
//! 태그 조회/생성 함수입니다. 실제 SQL은 `labels` 모듈이 구성하고,
//! 여기서는 라벨 종류를 `LabelKind::Tag`로 고정합니다.

use sqlx::SqlitePool;

use super::labels::{self, LabelKind};
use crate::error::AppError;
use crate::models::Tag;

/// `owner`의 태그를 이름 내림차순으로 조회합니다.
///
/// `assigned_only`가 true면 레시피에 연결된 태그만, 중복 없이 반환합니다.
pub async fn list_tags(
    pool: &SqlitePool,
    owner: &str,
    assigned_only: bool,
) -> Result<Vec<Tag>, AppError> {
    labels::list_labels(pool, LabelKind::Tag, owner, assigned_only).await
}

/// `owner` 소유의 새 태그를 생성합니다. 이름 검증은 요청 추출 단계에서 끝난 상태입니다.
pub async fn create_tag(pool: &SqlitePool, owner: &str, name: &str) -> Result<Tag, AppError> {
    labels::create_label(pool, LabelKind::Tag, owner, name).await
}
