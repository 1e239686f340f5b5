//! Session identifier carried in a cookie.

use arena_core::SessionId;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use tracing::debug;

pub const SESSION_COOKIE: &str = "arena_session";

/// The session a request belongs to, and whether it was just minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCarrier {
    pub session: SessionId,
    pub minted: bool,
}

impl SessionCarrier {
    /// Reads the session cookie, minting a fresh id when it is absent or
    /// does not parse.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match find_session_cookie(headers) {
            Some(session) => Self {
                session,
                minted: false,
            },
            None => {
                let session = SessionId::new();
                debug!("Minted session {session}");
                Self {
                    session,
                    minted: true,
                }
            }
        }
    }

    /// Adds `Set-Cookie` to `response` when the id was minted for this request.
    #[must_use]
    pub fn attach(self, mut response: Response) -> Response {
        if self.minted {
            let cookie = format!(
                "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
                self.session
            );
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

fn find_session_cookie(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn reads_existing_cookie_among_others() {
        let id = SessionId::new();
        let carrier = SessionCarrier::from_headers(&headers(&format!(
            "theme=dark; {SESSION_COOKIE}={id}; lang=pt"
        )));

        assert_eq!(carrier.session, id);
        assert!(!carrier.minted);
    }

    #[test]
    fn mints_when_missing_or_garbled() {
        assert!(SessionCarrier::from_headers(&HeaderMap::new()).minted);
        assert!(SessionCarrier::from_headers(&headers(&format!("{SESSION_COOKIE}=nope"))).minted);
    }

    #[test]
    fn attach_sets_cookie_only_when_minted() {
        let minted = SessionCarrier::from_headers(&HeaderMap::new());
        let response = minted.attach(().into_response());
        let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}={}", minted.session)));
        assert!(set_cookie.contains("HttpOnly"));

        let existing = SessionCarrier {
            session: SessionId::new(),
            minted: false,
        };
        assert!(existing.attach(().into_response()).headers().get(SET_COOKIE).is_none());
    }
}
