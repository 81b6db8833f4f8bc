use crate::auth::Actor;
use crate::error::{ServiceError, ServiceResult};
use triage_core::config::{AuthMethod, Settings};
use triage_db::{
    error::DbError,
    model::user::{NewUser, User},
    store::Store,
};

/// ## Summary
/// Finds the user with `email`, creating it on first sight.
///
/// ## Side Effects
/// - Inserts a user row when none exists
///
/// ## Errors
/// Returns an error if the store lookup or insert fails.
#[tracing::instrument(skip(store))]
pub async fn provision_user(
    store: &dyn Store,
    email: &str,
    display_name: Option<&str>,
) -> ServiceResult<User> {
    if let Some(user) = store.user_by_email(email).await? {
        tracing::trace!(user_id = %user.id, "User already provisioned");
        return Ok(user);
    }

    let new_user = NewUser {
        email: email.to_string(),
        display_name: display_name.map(str::to_string),
    };

    match store.insert_user(new_user).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, user_email = %user.email, "User provisioned");
            Ok(user)
        }
        // A concurrent request provisioned the same email first.
        Err(DbError::ConstraintViolation(_)) => store
            .user_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {email}"))),
        Err(e) => Err(e.into()),
    }
}

/// Get the user configured in settings for single user authentication.
///
/// If it doesn't exist, insert it into the store.
///
/// ## Errors
///
/// Returns an error if the configuration is incomplete or the store fails.
#[tracing::instrument(skip(store, config))]
async fn authenticate_single_user(store: &dyn Store, config: &Settings) -> ServiceResult<Actor> {
    tracing::debug!("Authenticating single user");

    let single_user_config =
        config
            .auth
            .single_user
            .as_ref()
            .ok_or(ServiceError::InvalidConfiguration(
                "Single user config is missing".to_string(),
            ))?;

    let user = provision_user(
        store,
        &single_user_config.email,
        Some(&single_user_config.name),
    )
    .await?;
    Ok(Actor::from_user(&user))
}

/// Trust the email an authenticating reverse proxy puts into the configured
/// header.
///
/// ## Errors
///
/// Returns `NotAuthenticated` if the header is absent or empty.
#[tracing::instrument(skip(req, store, config))]
async fn authenticate_proxy(
    req: &salvo::Request,
    store: &dyn Store,
    config: &Settings,
) -> ServiceResult<Actor> {
    let header = config.auth.proxy_header();

    let email = req
        .headers()
        .get(header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or(ServiceError::NotAuthenticated)?;

    tracing::debug!(header, email, "Authenticating proxy user");
    let user = provision_user(store, email, None).await?;
    Ok(Actor::from_user(&user))
}

/// ## Summary
/// Authenticate a user based on the configured authentication method.
///
/// ## Errors
/// Returns an error if authentication fails.
#[tracing::instrument(skip(req, store, config))]
pub async fn authenticate(
    req: &salvo::Request,
    store: &dyn Store,
    config: &Settings,
) -> ServiceResult<Actor> {
    tracing::trace!(auth_method = ?config.auth.method, "Authenticating request");

    match config.auth.method {
        AuthMethod::SingleUser => authenticate_single_user(store, config).await,
        AuthMethod::Proxy => authenticate_proxy(req, store, config).await,
    }
}
