use rocket::form::Form;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::{Route, State};
use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::db;
use crate::error::{AppError, Result};
use crate::forms::{FormErrors, NoteDraft, NoteInput};
use crate::models::Note;
use crate::views::{self, Page};

pub fn routes() -> Vec<Route> {
    routes![
        home,
        list,
        add_page,
        add,
        success,
        detail,
        edit_page,
        edit,
        delete_page,
        delete
    ]
}

// Routes //////////////////////////////////////////////////////////////////////////////////////////

#[get("/")]
pub fn home(user: Option<AuthUser>) -> RawHtml<String> {
    views::home(user.as_ref())
}

#[get("/notes")]
pub async fn list(user: AuthUser, pool: &State<SqlitePool>) -> Result<RawHtml<String>> {
    let notes = db::list_notes(pool, user.id).await?;
    Ok(views::notes_list(&user, &notes))
}

#[get("/add")]
pub fn add_page(user: AuthUser) -> RawHtml<String> {
    views::note_form(
        &user,
        "New note",
        &uri!(add_page).to_string(),
        &NoteInput::default(),
        &FormErrors::default(),
    )
}

#[post("/add", data = "<form>")]
pub async fn add(user: AuthUser, pool: &State<SqlitePool>, form: Form<NoteInput>) -> Result<Page> {
    match create(pool, user.id, &form).await {
        Ok(id) => {
            tracing::info!(note_id = id, author_id = user.id, "note created");
            Ok(Page::Redirect(Redirect::found(uri!(success))))
        }
        Err(err) => rerender(err, |errors| {
            views::note_form(&user, "New note", &uri!(add_page).to_string(), &form, errors)
        }),
    }
}

#[get("/done")]
pub fn success(user: AuthUser) -> RawHtml<String> {
    views::success(&user)
}

#[get("/note/<slug>")]
pub async fn detail(user: AuthUser, pool: &State<SqlitePool>, slug: &str) -> Result<RawHtml<String>> {
    let note = db::find_note(pool, user.id, slug).await?;
    Ok(views::note_detail(&user, &note))
}

#[get("/edit/<slug>")]
pub async fn edit_page(
    user: AuthUser,
    pool: &State<SqlitePool>,
    slug: &str,
) -> Result<RawHtml<String>> {
    let note = db::find_note(pool, user.id, slug).await?;
    Ok(views::note_form(
        &user,
        "Edit note",
        &uri!(edit_page(note.slug.as_str())).to_string(),
        &NoteInput::from(&note),
        &FormErrors::default(),
    ))
}

#[post("/edit/<slug>", data = "<form>")]
pub async fn edit(
    user: AuthUser,
    pool: &State<SqlitePool>,
    slug: &str,
    form: Form<NoteInput>,
) -> Result<Page> {
    let note = db::find_note(pool, user.id, slug).await?;

    match update(pool, &note, &form).await {
        Ok(()) => {
            tracing::info!(note_id = note.id, author_id = user.id, "note updated");
            Ok(Page::Redirect(Redirect::found(uri!(success))))
        }
        Err(err) => rerender(err, |errors| {
            views::note_form(
                &user,
                "Edit note",
                &uri!(edit_page(note.slug.as_str())).to_string(),
                &form,
                errors,
            )
        }),
    }
}

#[get("/delete/<slug>")]
pub async fn delete_page(
    user: AuthUser,
    pool: &State<SqlitePool>,
    slug: &str,
) -> Result<RawHtml<String>> {
    let note = db::find_note(pool, user.id, slug).await?;
    Ok(views::delete_confirm(&user, &note))
}

#[post("/delete/<slug>")]
pub async fn delete(user: AuthUser, pool: &State<SqlitePool>, slug: &str) -> Result<Redirect> {
    let note = db::find_note(pool, user.id, slug).await?;

    if !db::delete_note(pool, user.id, note.id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(note_id = note.id, author_id = user.id, "note deleted");
    Ok(Redirect::found(uri!(success)))
}

// Form handling ///////////////////////////////////////////////////////////////////////////////////

/// Validate a submission and check its slug against every other note.
async fn clean(pool: &SqlitePool, input: &NoteInput, note_id: Option<i64>) -> Result<NoteDraft> {
    let draft = input.to_draft().map_err(AppError::Validation)?;

    if db::slug_exists(pool, &draft.slug, note_id).await? {
        return Err(AppError::SlugTaken(draft.slug));
    }

    Ok(draft)
}

async fn create(pool: &SqlitePool, author_id: i64, input: &NoteInput) -> Result<i64> {
    let draft = clean(pool, input, None).await?;
    db::create_note(pool, author_id, &draft).await
}

async fn update(pool: &SqlitePool, note: &Note, input: &NoteInput) -> Result<()> {
    let draft = clean(pool, input, Some(note.id)).await?;

    if db::update_note(pool, note.author_id, note.id, &draft).await? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

/// Turn form-level failures into the form page again; anything else
/// propagates to the catchers.
fn rerender(err: AppError, render: impl FnOnce(&FormErrors) -> RawHtml<String>) -> Result<Page> {
    let errors = match err {
        AppError::Validation(errors) => errors,
        AppError::SlugTaken(slug) => FormErrors::slug_taken(&slug),
        other => return Err(other),
    };

    tracing::debug!(?errors, "note form rejected");
    Ok(Page::Html(render(&errors)))
}
