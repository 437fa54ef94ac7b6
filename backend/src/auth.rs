use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};
use rocket::http::uri::Origin;
use rocket::http::{Cookie, CookieJar, Status};
use rocket::request::{FromRequest, Outcome};
use rocket::response::Redirect;
use rocket::Request;
use sqlx::SqlitePool;

use crate::db;
use crate::error::{AppError, Result};

/// Private cookie holding the signed-in user's id.
pub const SESSION_COOKIE: &str = "user_id";
pub const LOGIN_PATH: &str = "/auth/login";
pub const DEFAULT_REDIRECT: &str = "/notes";

/// Everything but unreserved characters and `/` is escaped in the `next`
/// query value, including `%`, `?` and `&` of the wrapped URI.
const NEXT_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Characters that cannot appear raw in a redirect target. Existing escapes,
/// `/` and `?` are left alone.
const REDIRECT_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'#')
    .add(b'|')
    .add(b'^')
    .add(b'[')
    .add(b']');

/// The signed-in user. Routes taking this guard are closed to anonymous
/// callers, who get redirected to the login page by [`login_required`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthUser {
    type Error = AppError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let user_id = request
            .cookies()
            .get_private(SESSION_COOKIE)
            .and_then(|cookie| cookie.value().parse::<i64>().ok());

        let Some(user_id) = user_id else {
            return Outcome::Error((Status::Unauthorized, AppError::Unauthenticated));
        };

        let Some(pool) = request.rocket().state::<SqlitePool>() else {
            tracing::error!("database pool is not managed");
            return Outcome::Error((
                Status::InternalServerError,
                AppError::Internal("database pool is not managed".into()),
            ));
        };

        match db::find_user(pool, user_id).await {
            Ok(Some(user)) => Outcome::Success(AuthUser {
                id: user.id,
                username: user.username,
            }),
            Ok(None) => {
                tracing::debug!(user_id, "session refers to an unknown user");
                Outcome::Error((Status::Unauthorized, AppError::Unauthenticated))
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load session user");
                Outcome::Error((Status::InternalServerError, e))
            }
        }
    }
}

/// Sends anonymous callers of protected routes to the login page, keeping
/// the URI they asked for (path and query) in `next`.
#[catch(401)]
pub fn login_required(request: &Request<'_>) -> Redirect {
    Redirect::found(login_url(&request.uri().to_string()))
}

pub fn login_url(next: &str) -> String {
    format!("{LOGIN_PATH}?next={}", utf8_percent_encode(next, NEXT_VALUE))
}

pub fn start_session(cookies: &CookieJar<'_>, user_id: i64) {
    cookies.add_private(Cookie::new(SESSION_COOKIE, user_id.to_string()));
}

pub fn end_session(cookies: &CookieJar<'_>) {
    cookies.remove_private(Cookie::from(SESSION_COOKIE));
}

/// Hash a password with Argon2id and a random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|e| AppError::PasswordHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::PasswordHash(e.to_string())),
    }
}

/// Where to send a user after login: `next` when it is a local origin URI,
/// otherwise the note list. Decoded characters that are not valid in a URI
/// are escaped again before the target is parsed.
pub fn redirect_target(next: Option<&str>) -> String {
    let Some(path) = next else {
        return DEFAULT_REDIRECT.to_string();
    };
    if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') {
        return DEFAULT_REDIRECT.to_string();
    }

    let encoded = utf8_percent_encode(path, REDIRECT_PATH).to_string();
    match Origin::parse_owned(encoded) {
        Ok(origin) => origin.to_string(),
        Err(e) => {
            tracing::debug!(next = path, error = %e, "ignoring unusable next target");
            DEFAULT_REDIRECT.to_string()
        }
    }
}
