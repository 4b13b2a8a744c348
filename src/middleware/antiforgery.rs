//! Middleware anti-forgery
//!
//! Las vistas de formulario fijan una cookie `HttpOnly; SameSite=Strict` con un
//! nonce aleatorio y entregan un token firmado con el hash de ese nonce. Todo
//! POST debe traer el token, en la cabecera `RequestVerificationToken` o en el
//! campo `__RequestVerificationToken`, junto con la cookie que lo originó. El
//! resto de métodos pasa sin comprobación.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    async_trait,
    body::{to_bytes, Body},
    extract::{FromRequest, FromRequestParts, Request, State},
    http::{
        self,
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue, Method,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Form,
};
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::{internal_error, AppError};
use crate::utils::jwt::{generate_token, verify_token};

pub const ANTIFORGERY_HEADER: &str = "RequestVerificationToken";
pub const ANTIFORGERY_FIELD: &str = "__RequestVerificationToken";
pub const ANTIFORGERY_COOKIE: &str = "RequestVerificationCookie";

/// Tamaño máximo del cuerpo de un formulario
const MAX_FORM_BYTES: usize = 64 * 1024;

/// Nonce anti-forgery del cliente: el de su cookie o uno nuevo que se
/// fija al responder.
#[derive(Debug, Clone)]
pub struct AntiforgeryCookie {
    nonce: String,
    issued: bool,
}

impl AntiforgeryCookie {
    /// Token para una vista de formulario, válido sólo con esta cookie
    pub fn token(&self, state: &AppState) -> Result<String, AppError> {
        generate_token(&state.antiforgery, &self.nonce)
    }

    /// Añade `Set-Cookie` a la respuesta si el nonce es nuevo
    pub fn attach(self, state: &AppState, response: impl IntoResponse) -> Result<Response, AppError> {
        let mut response = response.into_response();
        if self.issued {
            let mut cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Strict",
                ANTIFORGERY_COOKIE, self.nonce
            );
            if !state.config.is_development() {
                cookie.push_str("; Secure");
            }
            let value = HeaderValue::from_str(&cookie).map_err(|e| internal_error(&e.to_string()))?;
            response.headers_mut().append(SET_COOKIE, value);
        }
        Ok(response)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AntiforgeryCookie
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(match cookie_nonce(&parts.headers) {
            Some(nonce) => Self {
                nonce,
                issued: false,
            },
            None => Self {
                nonce: Uuid::new_v4().to_string(),
                issued: true,
            },
        })
    }
}

/// Nonce de la cookie anti-forgery, si viene una bien formada
pub fn cookie_nonce(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ANTIFORGERY_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
        .map(|nonce| nonce.to_string())
}

pub async fn antiforgery_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() != Method::POST {
        return Ok(next.run(request).await);
    }

    let nonce = cookie_nonce(request.headers())
        .ok_or_else(|| AppError::Antiforgery("cookie not present".to_string()))?;

    let header_token = request
        .headers()
        .get(ANTIFORGERY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if let Some(token) = header_token {
        verify_token(&token, &state.antiforgery, &nonce)?;
        return Ok(next.run(request).await);
    }

    // el cuerpo se lee una vez y se vuelve a poner en el request para el handler
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_FORM_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(format!("Unreadable request body: {}", e)))?;

    let token = form_token(bytes.clone())
        .await?
        .ok_or_else(|| AppError::Antiforgery("token not present".to_string()))?;
    verify_token(&token, &state.antiforgery, &nonce)?;

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

async fn form_token(bytes: axum::body::Bytes) -> Result<Option<String>, AppError> {
    let probe = http::Request::builder()
        .method(Method::POST)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(bytes))
        .map_err(|e| internal_error(&e.to_string()))?;

    match Form::<HashMap<String, String>>::from_request(probe, &()).await {
        Ok(Form(mut fields)) => Ok(fields.remove(ANTIFORGERY_FIELD)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_form_token_is_found() {
        let body = axum::body::Bytes::from("Make=Toyota&__RequestVerificationToken=a.b.c&Year=2020");
        assert_eq!(form_token(body).await.unwrap().as_deref(), Some("a.b.c"));
    }

    #[tokio::test]
    async fn test_form_without_token() {
        let body = axum::body::Bytes::from("Make=Toyota");
        assert_eq!(form_token(body).await.unwrap(), None);
    }

    #[test]
    fn test_cookie_nonce_among_other_cookies() {
        let nonce = Uuid::new_v4().to_string();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}; lang=es", ANTIFORGERY_COOKIE, nonce))
                .unwrap(),
        );
        assert_eq!(cookie_nonce(&headers), Some(nonce));
    }

    #[test]
    fn test_malformed_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{}=not-a-nonce", ANTIFORGERY_COOKIE)).unwrap(),
        );
        assert_eq!(cookie_nonce(&headers), None);
        assert_eq!(cookie_nonce(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_new_nonce_is_issued_without_cookie() {
        let (mut parts, _) = http::Request::new(()).into_parts();
        let cookie = AntiforgeryCookie::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(cookie.issued);
        assert!(Uuid::parse_str(&cookie.nonce).is_ok());
    }
}
