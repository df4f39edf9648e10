use actix_web::dev::Payload;
use actix_web::{http::header, web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;

use super::identity;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// The user making the request, resolved from its `Authorization: Bearer` header.
///
/// Resolution happens at most once per request: the first extraction stores
/// the user in the request extensions and later extractions reuse it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Returns the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AppError::Unauthorized("Not authenticated".into())),
    }
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<User>().cloned() {
            return Box::pin(async move { Ok(CurrentUser(user)) });
        }

        let req = req.clone();
        Box::pin(async move {
            let token = bearer_token(&req)?;
            let state = req.app_data::<web::Data<AppState>>().cloned().ok_or_else(|| {
                AppError::InternalServerError("Application state is not configured".into())
            })?;
            let user = identity::resolve(&state.tokens, state.store.as_ref(), token).await?;

            req.extensions_mut().insert(user.clone());
            Ok::<_, ActixError>(CurrentUser(user))
        })
    }
}
