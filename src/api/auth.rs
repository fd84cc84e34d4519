//! Authentication context extractor
//!
//! Authentication itself is an upstream concern: a gateway in front of this
//! service authenticates the caller and forwards an opaque user identifier
//! in the `x-user-id` header. This extractor reads that header; it never
//! rejects, because an absent identifier is a valid anonymous submission.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Header populated by the upstream auth gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// Opaque user identifier from the auth collaborator, if any
#[derive(Debug, Clone)]
pub struct AuthUser(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .filter(|value| !value.is_empty());

        Ok(AuthUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> AuthUser {
        let (mut parts, _) = request.into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_extracts_user_id_header() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user-42")
            .body(())
            .unwrap();
        let AuthUser(user_id) = extract(request).await;
        assert_eq!(user_id.as_deref(), Some("user-42"));
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        let request = Request::builder().body(()).unwrap();
        let AuthUser(user_id) = extract(request).await;
        assert!(user_id.is_none());
    }

    #[tokio::test]
    async fn test_empty_header_is_anonymous() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "")
            .body(())
            .unwrap();
        let AuthUser(user_id) = extract(request).await;
        assert!(user_id.is_none());
    }
}
