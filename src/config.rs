//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: 토큰 서명에 사용할 비밀키 (필수)
//! - `HOST` / `PORT`: 서버 바인딩 주소
//! - `TOKEN_TTL_MINUTES`: 발급한 토큰의 유효 시간(분)
//! - `DB_CONNECT_ATTEMPTS`: 시작 시 DB 연결 재시도 횟수
//! - `RECIPE_LINKS_SAME_OWNER`: 레시피에 다른 사용자의 태그/재료 연결을 막을지 여부

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:recipes.db")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 토큰 유효 시간(분). 기본값은 하루(1440분)
    pub token_ttl_minutes: i64,
    /// DB 연결 시도 횟수 (1초 간격). 최소 1회
    pub db_connect_attempts: u32,
    /// true면 레시피는 같은 소유자의 태그/재료만 연결할 수 있습니다.
    pub recipe_links_same_owner: bool,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Self::from_lookup(|key| env::var(key))
    }

    /// 임의의 키 조회 함수로 설정을 구성합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        Ok(Self {
            database_url: lookup("DATABASE_URL")?,
            jwt_secret: lookup("JWT_SECRET")?,
            host: lookup("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            // 파싱 실패 시 기본값 사용
            port: lookup("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            token_ttl_minutes: lookup("TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|minutes: &i64| *minutes > 0)
                .unwrap_or(1440),
            db_connect_attempts: lookup("DB_CONNECT_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10u32)
                .max(1),
            recipe_links_same_owner: lookup("RECIPE_LINKS_SAME_OWNER")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, env::VarError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned().ok_or(env::VarError::NotPresent)
    }

    #[test]
    fn defaults_apply_when_optional_vars_missing() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.token_ttl_minutes, 1440);
        assert_eq!(config.db_connect_attempts, 10);
        assert!(!config.recipe_links_same_owner);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite::memory:")]));
        assert!(result.is_err());
    }

    #[test]
    fn parses_overrides_and_ignores_garbage() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "secret"),
            ("PORT", "not-a-port"),
            ("TOKEN_TTL_MINUTES", "30"),
            ("DB_CONNECT_ATTEMPTS", "0"),
            ("RECIPE_LINKS_SAME_OWNER", "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.token_ttl_minutes, 30);
        assert_eq!(config.db_connect_attempts, 1);
        assert!(config.recipe_links_same_owner);
    }
}
