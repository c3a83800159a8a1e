//! 外部身份服务签发的 access token 校验（HS256）

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::errors::{BiolinkError, Result};

/// Access token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// 用户 id
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

pub struct JwtVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// `audience` 为空时不校验 aud
    pub fn new(secret: &str, audience: &str, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&[audience]);
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(BiolinkError::validation("auth.jwt_secret is not configured"));
        }
        Ok(Self::new(
            &config.jwt_secret,
            &config.audience,
            config.leeway_secs,
        ))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        if data.claims.sub.is_empty() {
            return Err(BiolinkError::unauthorized("Token has no subject"));
        }
        Ok(data.claims)
    }

    /// 用同一密钥签发 token（本地开发和测试用）
    pub fn sign(&self, claims: &SessionClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| BiolinkError::serialization(format!("Failed to sign token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    const SECRET: &str = "test_secret_key_32_bytes_long!!";

    fn claims(exp_offset: Duration, aud: Option<&str>) -> SessionClaims {
        SessionClaims {
            sub: "user-1".into(),
            email: Some("a@example.com".into()),
            exp: (Utc::now() + exp_offset).timestamp(),
            aud: aud.map(String::from),
        }
    }

    #[test]
    fn test_valid_token() {
        let verifier = JwtVerifier::new(SECRET, "authenticated", 0);
        let token = verifier
            .sign(&claims(Duration::hours(1), Some("authenticated")))
            .unwrap();
        let decoded = verifier.verify(&token).unwrap();
        assert_eq!(decoded.sub, "user-1");
        assert_eq!(decoded.email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let verifier = JwtVerifier::new(SECRET, "authenticated", 0);
        let token = verifier
            .sign(&claims(Duration::hours(1), Some("anon")))
            .unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(BiolinkError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = JwtVerifier::new(SECRET, "authenticated", 0);
        let token = verifier
            .sign(&claims(-Duration::hours(1), Some("authenticated")))
            .unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtVerifier::new("another_secret_value_of_32_bytes", "", 0);
        let verifier = JwtVerifier::new(SECRET, "", 0);
        let token = issuer.sign(&claims(Duration::hours(1), None)).unwrap();
        assert!(verifier.verify(&token).is_err());
        assert!(verifier.verify("not.a.token").is_err());
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        assert!(JwtVerifier::from_config(&AuthConfig::default()).is_err());
    }
}
