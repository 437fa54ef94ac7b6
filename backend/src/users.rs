use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::{Route, State};
use sqlx::SqlitePool;

use crate::auth;
use crate::db;
use crate::error::{AppError, Result};
use crate::forms::{FormErrors, LoginInput, SignupInput};
use crate::views::{self, Page};

const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

pub fn routes() -> Vec<Route> {
    routes![login_page, login, logout, logout_post, signup_page, signup]
}

#[get("/auth/login?<next>")]
pub fn login_page(next: Option<String>) -> RawHtml<String> {
    let input = LoginInput {
        next,
        ..LoginInput::default()
    };
    views::login(&input, &FormErrors::default())
}

#[post("/auth/login", data = "<form>")]
pub async fn login(
    pool: &State<SqlitePool>,
    cookies: &CookieJar<'_>,
    form: Form<LoginInput>,
) -> Result<Page> {
    let input = form.into_inner();

    let user = match db::find_user_by_username(pool, input.username.trim()).await? {
        Some(user) if auth::verify_password(&input.password, &user.password_hash)? => user,
        _ => {
            tracing::info!(username = %input.username, "failed login attempt");
            let mut errors = FormErrors::default();
            errors.add_non_field(INVALID_LOGIN);
            return Ok(Page::Html(views::login(&input, &errors)));
        }
    };

    auth::start_session(cookies, user.id);
    tracing::info!(user_id = user.id, "user logged in");

    let target = auth::redirect_target(input.next.as_deref());
    Ok(Page::Redirect(Redirect::found(target)))
}

#[get("/auth/logout")]
pub fn logout(cookies: &CookieJar<'_>) -> RawHtml<String> {
    auth::end_session(cookies);
    views::logged_out()
}

#[post("/auth/logout")]
pub fn logout_post(cookies: &CookieJar<'_>) -> RawHtml<String> {
    logout(cookies)
}

#[get("/auth/signup")]
pub fn signup_page() -> RawHtml<String> {
    views::signup(&SignupInput::default(), &FormErrors::default())
}

#[post("/auth/signup", data = "<form>")]
pub async fn signup(pool: &State<SqlitePool>, form: Form<SignupInput>) -> Result<Page> {
    let signup = match form.to_signup() {
        Ok(signup) => signup,
        Err(errors) => return Ok(Page::Html(views::signup(&form, &errors))),
    };

    let password_hash = auth::hash_password(&signup.password)?;
    match db::create_user(pool, &signup.username, &password_hash).await {
        Ok(user_id) => {
            tracing::info!(user_id, username = %signup.username, "user signed up");
            Ok(Page::Redirect(Redirect::found(uri!(login_page(_)))))
        }
        Err(AppError::UsernameTaken(_)) => {
            let mut errors = FormErrors::default();
            errors.add("username", "A user with that username already exists.");
            Ok(Page::Html(views::signup(&form, &errors)))
        }
        Err(e) => Err(e),
    }
}
