use axum::http::{HeaderMap, HeaderValue, header};
use session::SessionId;

pub const SESSION_COOKIE: &str = "ocr_session";

/// Value of the session cookie, if the client sent one.
pub fn session_id_from(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

pub fn set_cookie_value(id: &SessionId) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, id
    ))
    .ok()
}
