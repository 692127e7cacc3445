//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `user`: 사용자(User)와 인증 요청/응답
//! - `tag`, `ingredient`: 사용자별 라벨 (태그, 재료)
//! - `recipe`: 레시피 요약/상세 응답과 생성/수정 요청
//!
//! 레시피/라벨 모델은 `pub use X::*;`로 재공개하여 `crate::models::Tag`처럼 접근합니다.
//! 사용자 모델은 `crate::models::user::*`로 가져옵니다.

pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod user;

pub use ingredient::*;
pub use recipe::*;
pub use tag::*;

use serde::{Deserialize, Deserializer};
use validator::Validate;

/// 목록 조회 쿼리스트링: `?assigned_only=1`
///
/// 태그와 재료 목록이 같은 필터를 공유합니다. 0이 아닌 값이면 켜집니다.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AssignedFilter {
    #[serde(default)]
    pub assigned_only: u8,
}

impl AssignedFilter {
    pub fn enabled(&self) -> bool {
        self.assigned_only != 0
    }
}

/// 키가 존재하면 항상 `Some`으로 감쌉니다.
///
/// `#[serde(default, deserialize_with = "deserialize_some")]`와 함께 쓰면
/// 키 누락은 `None`, 키가 있으면 `Some(..)`이 됩니다.
/// `Option<Option<T>>` 필드에서는 `null`이 `Some(None)`으로 구분됩니다.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
