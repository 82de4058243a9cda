/// Cookie-based session authentication
///
/// The session cookie carries a signed session token (see
/// `taskboard_shared::auth::session`). [`require_session`] resolves it
/// against the session store and injects an [`AuthContext`] into the request
/// extensions; handlers read it with `Extension<AuthContext>`.
///
/// # Cookie
///
/// ```text
/// Set-Cookie: taskboard_session=<token>.<hmac>; HttpOnly; SameSite=Lax[; Secure]; Path=/; Max-Age=604800
/// ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use cookie::{time::Duration, Cookie, SameSite};
use taskboard_shared::auth::session::{generate_session_token, sign_token, verify_signed_token};

use crate::{app::AppState, error::ApiError};

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "taskboard_session";

/// Authenticated caller, inserted by [`require_session`]
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Logged-in user
    pub user_id: i64,

    /// Server-side session token
    pub session_token: String,
}

/// Returns the raw value of the session cookie, if any
///
/// Every `Cookie` header is searched; unparsable pairs are skipped.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

fn build_cookie(value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn header_value(cookie: &Cookie<'_>) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| ApiError::InternalError(format!("Invalid session cookie: {}", e)))
}

/// Builds the `Set-Cookie` value that stores `signed_token`
pub fn session_cookie_header(
    signed_token: &str,
    max_age_secs: u64,
    secure: bool,
) -> Result<HeaderValue, ApiError> {
    let max_age = i64::try_from(max_age_secs)
        .map(Duration::seconds)
        .map_err(|e| ApiError::InternalError(format!("Invalid session lifetime: {}", e)))?;

    header_value(&build_cookie(signed_token.to_string(), max_age, secure))
}

/// Builds the `Set-Cookie` value that removes the session cookie
pub fn expired_session_cookie_header(secure: bool) -> Result<HeaderValue, ApiError> {
    header_value(&build_cookie(String::new(), Duration::ZERO, secure))
}

/// Resolves the request's session to `(token, user_id)`
///
/// Missing, forged and expired cookies all resolve to None.
pub async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<(String, i64)>, ApiError> {
    let Some(raw) = session_cookie(headers) else {
        return Ok(None);
    };

    let Some(token) = verify_signed_token(&raw, state.secret_key()) else {
        tracing::debug!("Rejected session cookie with invalid signature");
        return Ok(None);
    };

    let user_id = state.sessions.get(&token).await?;
    Ok(user_id.map(|user_id| (token, user_id)))
}

/// Starts a new session for `user_id`, replacing `previous` if given
///
/// Returns the `Set-Cookie` header value for the new session.
pub async fn start_session(
    state: &AppState,
    user_id: i64,
    previous: Option<&str>,
) -> Result<HeaderValue, ApiError> {
    if let Some(previous) = previous {
        state.sessions.clear(previous).await?;
    }

    let token = generate_session_token();
    let lifetime = state.config.session_lifetime();
    state.sessions.set(&token, user_id, lifetime).await?;

    session_cookie_header(
        &sign_token(&token, state.secret_key()),
        lifetime.as_secs(),
        state.config.api.production,
    )
}

/// Session authentication middleware
///
/// Rejects the request with 401 unless it carries a valid session.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (session_token, user_id) = resolve_session(&state, req.headers())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    req.extensions_mut().insert(AuthContext {
        user_id,
        session_token,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; taskboard_session=abc.def; other=1"),
        );
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_session_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(header::COOKIE, HeaderValue::from_static("taskboard_session=xyz"));
        assert_eq!(session_cookie(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_session_cookie_missing() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_cookie(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("taskboard_sessionx=1"));
        assert_eq!(session_cookie(&headers), None);
    }

    #[test]
    fn test_session_cookie_skips_malformed_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("garbage; =novalue; taskboard_session=tok.sig"),
        );
        assert_eq!(session_cookie(&headers).as_deref(), Some("tok.sig"));
    }

    #[test]
    fn test_set_cookie_round_trips_through_parser() {
        let value = session_cookie_header("tok.sig", 60, true).unwrap();
        let parsed = Cookie::parse(value.to_str().unwrap().to_string()).unwrap();

        assert_eq!(parsed.name(), SESSION_COOKIE_NAME);
        assert_eq!(parsed.value(), "tok.sig");
        assert_eq!(parsed.http_only(), Some(true));
        assert_eq!(parsed.same_site(), Some(SameSite::Lax));
        assert_eq!(parsed.secure(), Some(true));
        assert_eq!(parsed.max_age(), Some(Duration::seconds(60)));
    }

    #[test]
    fn test_cookie_header_attributes() {
        let value = session_cookie_header("tok.sig", 3600, false).unwrap();
        let value = value.to_str().unwrap();
        assert!(value.starts_with("taskboard_session=tok.sig;"));
        assert!(value.contains("Max-Age=3600"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(!value.contains("Secure"));

        assert!(value.contains("Path=/"));

        let secure = session_cookie_header("tok.sig", 3600, true).unwrap();
        assert!(secure.to_str().unwrap().contains("; Secure"));
    }

    #[test]
    fn test_expired_cookie_header() {
        let value = expired_session_cookie_header(false).unwrap();
        let value = value.to_str().unwrap();
        assert!(value.starts_with("taskboard_session=;"));
        assert!(value.contains("Max-Age=0"));
        assert!(value.contains("Path=/"));
    }
}
