//! HTML rendering for every page the service serves.
//!
//! Markup is deliberately bare: one layout, forms with stable element ids,
//! and field errors rendered as `<li class="error" data-field="...">`.

use std::fmt::Write;

use rocket::response::content::RawHtml;
use rocket::response::Redirect;

use crate::auth::AuthUser;
use crate::forms::{FormErrors, LoginInput, NoteInput, SignupInput, TITLE_MAX_LENGTH};
use crate::models::Note;
use crate::slug::SLUG_MAX_LENGTH;

/// Outcome of a form submission: a redirect on success, otherwise the
/// form rendered again with its errors.
#[derive(Responder)]
pub enum Page {
    Html(RawHtml<String>),
    Redirect(Redirect),
}

pub fn home(user: Option<&AuthUser>) -> RawHtml<String> {
    let body = match user {
        Some(_) => r#"<p>Keep your notes in one place.</p>
<p><a href="/notes">My notes</a> | <a href="/add">New note</a></p>"#
            .to_string(),
        None => r#"<p>Keep your notes in one place.</p>
<p><a href="/auth/login">Log in</a> or <a href="/auth/signup">sign up</a> to get started.</p>"#
            .to_string(),
    };
    layout("Notes", user, &body)
}

pub fn notes_list(user: &AuthUser, notes: &[Note]) -> RawHtml<String> {
    let mut body = String::from("<h1>My notes</h1>\n");
    if notes.is_empty() {
        body.push_str("<p class=\"empty\">No notes yet.</p>\n");
    } else {
        body.push_str("<ul class=\"notes\">\n");
        for note in notes {
            let _ = writeln!(
                body,
                r#"<li><a href="/note/{slug}">{title}</a></li>"#,
                slug = escape(&note.slug),
                title = escape(&note.title),
            );
        }
        body.push_str("</ul>\n");
    }
    body.push_str("<p><a href=\"/add\">New note</a></p>\n");
    layout("My notes", Some(user), &body)
}

pub fn note_detail(user: &AuthUser, note: &Note) -> RawHtml<String> {
    let body = format!(
        r#"<article class="note">
<h1>{title}</h1>
<div class="text">{text}</div>
</article>
<p><a href="/edit/{slug}">Edit</a> | <a href="/delete/{slug}">Delete</a></p>
"#,
        title = escape(&note.title),
        text = escape(&note.text),
        slug = escape(&note.slug),
    );
    layout(&note.title, Some(user), &body)
}

pub fn note_form(
    user: &AuthUser,
    heading: &str,
    action: &str,
    input: &NoteInput,
    errors: &FormErrors,
) -> RawHtml<String> {
    let mut body = format!("<h1>{}</h1>\n", escape(heading));
    let _ = write!(
        body,
        r#"<form id="note-form" method="post" action="{action}">
{non_field}<label for="id_title">Title</label>
<input type="text" name="title" id="id_title" maxlength="{title_max}" value="{title}">
{title_errors}<label for="id_text">Text</label>
<textarea name="text" id="id_text">{text}</textarea>
{text_errors}<label for="id_slug">Slug</label>
<input type="text" name="slug" id="id_slug" maxlength="{slug_max}" value="{slug}">
<small>Leave blank to derive it from the title.</small>
{slug_errors}<button type="submit">Save</button>
</form>
"#,
        action = escape(action),
        non_field = non_field_errors(errors),
        title_max = TITLE_MAX_LENGTH,
        title = escape(&input.title),
        title_errors = field_errors(errors, "title"),
        text = escape(&input.text),
        text_errors = field_errors(errors, "text"),
        slug_max = SLUG_MAX_LENGTH,
        slug = escape(&input.slug),
        slug_errors = field_errors(errors, "slug"),
    );
    layout(heading, Some(user), &body)
}

pub fn delete_confirm(user: &AuthUser, note: &Note) -> RawHtml<String> {
    let body = format!(
        r#"<h1>Delete note</h1>
<p>Delete &quot;{title}&quot;? This cannot be undone.</p>
<form id="delete-form" method="post" action="/delete/{slug}">
<button type="submit">Delete</button>
</form>
"#,
        title = escape(&note.title),
        slug = escape(&note.slug),
    );
    layout("Delete note", Some(user), &body)
}

pub fn success(user: &AuthUser) -> RawHtml<String> {
    layout(
        "Done",
        Some(user),
        "<h1>Done</h1>\n<p>Your change has been saved.</p>\n<p><a href=\"/notes\">Back to my notes</a></p>\n",
    )
}

pub fn login(input: &LoginInput, errors: &FormErrors) -> RawHtml<String> {
    let next = input
        .next
        .as_deref()
        .map(|next| {
            format!(
                "<input type=\"hidden\" name=\"next\" value=\"{}\">\n",
                escape(next)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Log in</h1>
<form id="login-form" method="post" action="/auth/login">
{non_field}<label for="id_username">Username</label>
<input type="text" name="username" id="id_username" value="{username}">
<label for="id_password">Password</label>
<input type="password" name="password" id="id_password">
{next}<button type="submit">Log in</button>
</form>
<p>No account? <a href="/auth/signup">Sign up</a>.</p>
"#,
        non_field = non_field_errors(errors),
        username = escape(&input.username),
    );
    layout("Log in", None, &body)
}

pub fn signup(input: &SignupInput, errors: &FormErrors) -> RawHtml<String> {
    let body = format!(
        r#"<h1>Sign up</h1>
<form id="signup-form" method="post" action="/auth/signup">
<label for="id_username">Username</label>
<input type="text" name="username" id="id_username" value="{username}">
{username_errors}<label for="id_password1">Password</label>
<input type="password" name="password1" id="id_password1">
{password1_errors}<label for="id_password2">Password confirmation</label>
<input type="password" name="password2" id="id_password2">
{password2_errors}<button type="submit">Sign up</button>
</form>
"#,
        username = escape(&input.username),
        username_errors = field_errors(errors, "username"),
        password1_errors = field_errors(errors, "password1"),
        password2_errors = field_errors(errors, "password2"),
    );
    layout("Sign up", None, &body)
}

pub fn logged_out() -> RawHtml<String> {
    layout(
        "Logged out",
        None,
        "<h1>Logged out</h1>\n<p>You have been logged out. <a href=\"/auth/login\">Log in again</a>.</p>\n",
    )
}

fn layout(title: &str, user: Option<&AuthUser>, body: &str) -> RawHtml<String> {
    let nav = match user {
        Some(user) => format!(
            r#"<span class="user">{}</span> <a href="/notes">Notes</a> <a href="/add">Add</a> <a href="/auth/logout">Log out</a>"#,
            escape(&user.username)
        ),
        None => r#"<a href="/auth/login">Log in</a> <a href="/auth/signup">Sign up</a>"#.to_string(),
    };

    RawHtml(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<nav><a href="/">Home</a> {nav}</nav>
<main>
{body}</main>
</body>
</html>
"#,
        title = escape(title),
    ))
}

fn field_errors(errors: &FormErrors, field: &str) -> String {
    error_list(errors.field(field), Some(field))
}

fn non_field_errors(errors: &FormErrors) -> String {
    error_list(errors.non_field(), None)
}

fn error_list(messages: &[String], field: Option<&str>) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let mut out = String::from("<ul class=\"errorlist\">\n");
    for message in messages {
        match field {
            Some(field) => {
                let _ = writeln!(
                    out,
                    r#"<li class="error" data-field="{field}">{}</li>"#,
                    escape(message)
                );
            }
            None => {
                let _ = writeln!(out, r#"<li class="error">{}</li>"#, escape(message));
            }
        }
    }
    out.push_str("</ul>\n");
    out
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
