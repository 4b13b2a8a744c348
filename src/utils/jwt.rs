//! Utilidades JWT para tokens anti-forgery
//!
//! Cada vista de formulario entrega un token firmado (HS256) con expiración;
//! los POST deben devolverlo para ser aceptados. El token lleva el hash del
//! nonce de la cookie anti-forgery del cliente y sólo vale junto a esa cookie.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

const ANTIFORGERY_SUBJECT: &str = "antiforgery";

/// Claims del token anti-forgery
#[derive(Debug, Serialize, Deserialize)]
pub struct AntiforgeryClaims {
    pub sub: String,
    pub jti: String,
    /// SHA-256 (hex) del nonce de la cookie
    pub nonce_hash: String,
    pub exp: usize,
    pub iat: usize,
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Segundos de validez de cada token
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            // sin secreto configurado (sólo en desarrollo) los tokens valen para este proceso
            secret: config
                .antiforgery_secret
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            expiration: config.antiforgery_ttl_minutes * 60,
        }
    }
}

fn hash_nonce(nonce: &str) -> String {
    format!("{:x}", Sha256::digest(nonce.as_bytes()))
}

/// Generar un token anti-forgery nuevo para el nonce de un cliente
pub fn generate_token(config: &JwtConfig, nonce: &str) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.expiration as i64);

    let claims = AntiforgeryClaims {
        sub: ANTIFORGERY_SUBJECT.to_string(),
        jti: Uuid::new_v4().to_string(),
        nonce_hash: hash_nonce(nonce),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Error generating anti-forgery token: {}", e)))
}

/// Verificar y decodificar un token anti-forgery emitido para `nonce`
pub fn verify_token(token: &str, config: &JwtConfig, nonce: &str) -> Result<AntiforgeryClaims, AppError> {
    validate_token_format(token)?;

    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());
    let mut validation = Validation::default();
    validation.sub = Some(ANTIFORGERY_SUBJECT.to_string());

    let token_data = decode::<AntiforgeryClaims>(token, &decoding_key, &validation)
        .map_err(|e| AppError::Antiforgery(format!("invalid token: {}", e)))?;

    if token_data.claims.nonce_hash != hash_nonce(nonce) {
        return Err(AppError::Antiforgery(
            "token was not issued for this client".to_string(),
        ));
    }

    Ok(token_data.claims)
}

/// Validar formato de token (básico)
pub fn validate_token_format(token: &str) -> Result<(), AppError> {
    if token.is_empty() {
        return Err(AppError::Antiforgery("token is empty".to_string()));
    }

    if token.split('.').count() != 3 {
        return Err(AppError::Antiforgery(
            "token must have three dot-separated parts".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            expiration: 600,
        }
    }

    #[test]
    fn test_generate_and_verify() {
        let config = config("s3cret");
        let token = generate_token(&config, "nonce-a").unwrap();
        let claims = verify_token(&token, &config, "nonce-a").unwrap();
        assert_eq!(claims.sub, "antiforgery");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tokens_are_unique() {
        let config = config("s3cret");
        assert_ne!(
            generate_token(&config, "nonce-a").unwrap(),
            generate_token(&config, "nonce-a").unwrap()
        );
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_token(&config("one"), "nonce-a").unwrap();
        assert!(matches!(
            verify_token(&token, &config("two"), "nonce-a"),
            Err(AppError::Antiforgery(_))
        ));
    }

    #[test]
    fn test_token_is_bound_to_its_nonce() {
        let config = config("s3cret");
        let token = generate_token(&config, "nonce-a").unwrap();
        assert!(matches!(
            verify_token(&token, &config, "nonce-b"),
            Err(AppError::Antiforgery(_))
        ));
    }

    #[test]
    fn test_claims_do_not_reveal_the_nonce() {
        let config = config("s3cret");
        let token = generate_token(&config, "nonce-a").unwrap();
        let claims = verify_token(&token, &config, "nonce-a").unwrap();
        assert_ne!(claims.nonce_hash, "nonce-a");
        assert_eq!(claims.nonce_hash.len(), 64);
    }

    #[test]
    fn test_validate_token_format() {
        assert!(validate_token_format("").is_err());
        assert!(validate_token_format("abc").is_err());
        assert!(validate_token_format("a.b.c").is_ok());
    }
}
