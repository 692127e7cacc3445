//! # 레시피 모델 정의
//!
//! ## 응답 모양
//! - `RecipeSummary`: 목록/생성/수정 응답. 태그와 재료는 id 목록만 담습니다.
//! - `RecipeDetail`: 단건 조회 응답. 태그와 재료 객체를 그대로 중첩합니다.
//!
//! ## 요청 모양
//! - `RecipeRequest`: 생성(POST)과 전체 수정(PUT). 연결 필드를 생략하면 빈 집합입니다.
//! - `RecipePatchRequest`: 부분 수정(PATCH). 생략한 필드는 그대로 둡니다.
//!   `tags: []`(빈 집합으로 교체)와 `tags` 생략(변경 없음)은 서로 다른 요청입니다.

use std::{borrow::Cow, str::FromStr};

use bigdecimal::BigDecimal;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use super::{deserialize_some, Ingredient, Tag};
use crate::error::AppError;

/// DB의 `recipes` 테이블 한 행
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRow {
    pub id: String,
    pub title: String,
    pub time_minutes: i64,
    /// 소수점 2자리 10진 문자열 (예: "6.00")
    pub price: String,
    pub link: Option<String>,
}

impl RecipeRow {
    fn parsed_price(&self) -> Result<BigDecimal, AppError> {
        BigDecimal::from_str(&self.price).map_err(|e| {
            AppError::Internal(format!("Stored price {:?} of recipe {} is corrupt: {}", self.price, self.id, e))
        })
    }

    pub fn into_summary(
        self,
        tags: Vec<String>,
        ingredients: Vec<String>,
    ) -> Result<RecipeSummary, AppError> {
        let price = self.parsed_price()?;
        Ok(RecipeSummary {
            id: self.id,
            title: self.title,
            time_minutes: self.time_minutes,
            price,
            link: self.link,
            tags,
            ingredients,
        })
    }

    pub fn into_detail(
        self,
        tags: Vec<Tag>,
        ingredients: Vec<Ingredient>,
    ) -> Result<RecipeDetail, AppError> {
        let price = self.parsed_price()?;
        Ok(RecipeDetail {
            id: self.id,
            title: self.title,
            time_minutes: self.time_minutes,
            price,
            link: self.link,
            tags,
            ingredients,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub id: String,
    pub title: String,
    pub time_minutes: i64,
    pub price: BigDecimal,
    pub link: Option<String>,
    /// 연결된 태그 id
    pub tags: Vec<String>,
    /// 연결된 재료 id
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeDetail {
    pub id: String,
    pub title: String,
    pub time_minutes: i64,
    pub price: BigDecimal,
    pub link: Option<String>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

/// `POST /recipes`, `PUT /recipes/:id` 요청 본문
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeRequest {
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub title: String,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub time_minutes: i64,
    #[serde(deserialize_with = "deserialize_price")]
    #[validate(custom(function = "validate_price"))]
    pub price: BigDecimal,
    #[serde(default)]
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub link: Option<String>,
    /// 태그 id 목록. 생략하면 빈 집합
    #[serde(default)]
    pub tags: Vec<String>,
    /// 재료 id 목록. 생략하면 빈 집합
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// `PATCH /recipes/:id` 요청 본문
///
/// 모든 필드에서 `None`은 "요청에 없음"을 뜻합니다.
/// `link`만 `null`로 비울 수 있으므로 `Option<Option<_>>`입니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecipePatchRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub time_minutes: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_some_price")]
    #[validate(custom(function = "validate_price"))]
    pub price: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub link: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub ingredients: Option<Vec<String>>,
}

impl From<RecipeRequest> for RecipePatchRequest {
    /// 전체 수정은 모든 필드를 "보낸 것"으로 취급하는 부분 수정입니다.
    /// 생략된 연결 필드는 빈 집합으로, 생략된 `link`는 NULL로 바뀝니다.
    fn from(req: RecipeRequest) -> Self {
        Self {
            title: Some(req.title),
            time_minutes: Some(req.time_minutes),
            price: Some(req.price),
            link: Some(req.link),
            tags: Some(req.tags),
            ingredients: Some(req.ingredients),
        }
    }
}

/// 가격은 JSON 숫자(`5.5`)와 문자열(`"5.50"`)을 모두 받습니다.
/// 숫자도 문자열 표현을 거쳐 파싱하여 부동소수점 오차가 끼지 않게 합니다.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriceInput {
    Number(serde_json::Number),
    Text(String),
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match PriceInput::deserialize(deserializer)? {
        PriceInput::Number(n) => n.to_string(),
        PriceInput::Text(s) => s,
    };
    BigDecimal::from_str(raw.trim())
        .map_err(|_| D::Error::custom(format!("A valid number is required, got {:?}.", raw)))
}

fn deserialize_some_price<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_price(deserializer).map(Some)
}

/// 가격 전체 자릿수 / 소수부 자릿수 상한 (최대 999.99)
const PRICE_MAX_DIGITS: i64 = 5;
const PRICE_DECIMAL_PLACES: i64 = 2;

/// 음수 금지, 소수점 이하 2자리까지, 정수부 3자리까지
///
/// `1e10000000` 같은 지수 표기도 파싱은 되므로, 값을 펼치는 `with_scale`보다
/// 먼저 자릿수만으로 걸러냅니다.
fn validate_price(price: &BigDecimal) -> Result<(), ValidationError> {
    if price < &BigDecimal::from(0) {
        return Err(ValidationError::new("min_value").with_message(Cow::Borrowed(
            "Ensure this value is greater than or equal to 0.",
        )));
    }

    let (_, scale) = price.as_bigint_and_exponent();
    if scale > PRICE_DECIMAL_PLACES {
        return Err(ValidationError::new("decimal_places").with_message(Cow::Borrowed(
            "Ensure that there are no more than 2 decimal places.",
        )));
    }
    let whole_digits = i64::try_from(price.digits()).unwrap_or(i64::MAX).saturating_sub(scale);
    if whole_digits > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
        return Err(ValidationError::new("max_whole_digits").with_message(Cow::Borrowed(
            "Ensure that there are no more than 3 digits before the decimal point.",
        )));
    }
    Ok(())
}

/// 저장용 정규화: 항상 소수점 2자리 문자열
pub fn price_to_storage(price: &BigDecimal) -> String {
    price.with_scale(2).to_string()
}
