use super::token::{TokenError, TokenKind, TokenService};
use crate::error::AppError;
use crate::models::User;
use crate::store::UserStore;

/// Resolves an access token to the user it was issued for.
///
/// An expired token is `Unauthorized`; a token with a bad signature or an
/// unreadable payload is `Forbidden`. A valid token whose subject no longer
/// exists is `NotFound`.
pub async fn resolve<S: UserStore + ?Sized>(
    tokens: &TokenService,
    store: &S,
    token: &str,
) -> Result<User, AppError> {
    resolve_kind(tokens, store, TokenKind::Access, token).await
}

/// Same as [`resolve`], for refresh tokens.
pub async fn resolve_refresh<S: UserStore + ?Sized>(
    tokens: &TokenService,
    store: &S,
    token: &str,
) -> Result<User, AppError> {
    resolve_kind(tokens, store, TokenKind::Refresh, token).await
}

async fn resolve_kind<S: UserStore + ?Sized>(
    tokens: &TokenService,
    store: &S,
    kind: TokenKind,
    token: &str,
) -> Result<User, AppError> {
    let login = match kind {
        TokenKind::Access => tokens.validate_access(token),
        TokenKind::Refresh => tokens.validate_refresh(token),
    }
    .map_err(|e| {
        log::warn!("Rejected {:?} token: {}", kind, e);
        match e {
            TokenError::Expired => AppError::Unauthorized("Token expired".into()),
            TokenError::InvalidSignature | TokenError::Malformed => {
                AppError::Forbidden("Could not validate credentials".into())
            }
        }
    })?;

    store
        .find_user_by_login(&login)
        .await?
        .ok_or_else(|| AppError::NotFound("Could not find user".into()))
}
