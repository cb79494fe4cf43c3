#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, Router};

#[cfg(test)]
use fake::{faker::internet::en::SafeEmail, Fake};

/// Fixture identity used as the file owner in tests.
#[cfg(test)]
pub fn test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: "user-owner".to_string(),
        email: Some(SafeEmail().fake()),
    }
}

/// A second fixture identity that owns nothing.
#[cfg(test)]
pub fn other_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: "user-other".to_string(),
        email: Some(SafeEmail().fake()),
    }
}

/// Wraps a router with middleware that injects the given identity into
/// request extensions, standing in for the JWT auth middleware.
#[cfg(test)]
pub fn with_user_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}
