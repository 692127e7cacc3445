use serde::{Deserialize, Serialize};
use validator::Validate;

use super::deserialize_some;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 프로필 응답. 비밀번호 해시는 절대 내보내지 않습니다.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 5, message = "Ensure this field has at least 5 characters."))]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub email: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `PATCH /user/me`: 보낸 필드만 변경합니다.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(min = 5, message = "Ensure this field has at least 5 characters."))]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub name: Option<String>,
}

impl From<CreateUserRequest> for UpdateUserRequest {
    /// `PUT /user/me`는 모든 필드가 필수인 생성 요청과 같은 모양입니다.
    fn from(req: CreateUserRequest) -> Self {
        Self {
            email: Some(req.email),
            password: Some(req.password),
            name: Some(req.name),
        }
    }
}

/// Django식 이메일 정규화: 도메인 부분만 소문자로 바꿉니다.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}
