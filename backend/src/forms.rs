use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationErrors};

use crate::models::Note;
use crate::slug::slugify;

/// Appended to a colliding slug to form the slug field error.
pub const WARNING: &str = " - такой slug уже существует, придумайте уникальное значение!";

pub const TITLE_MAX_LENGTH: usize = 100;

const INVALID_SLUG: &str =
    "Enter a valid slug consisting of letters, numbers, underscores or hyphens.";

static SLUG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug regex is valid"));

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("username regex is valid"));

// Matches as soon as one character is not a digit.
static NOT_NUMERIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\D").expect("non-digit regex is valid"));

/// Validation messages keyed by form field, plus errors that belong to the
/// form as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    /// The error reported when `slug` is already used by another note.
    pub fn slug_taken(slug: &str) -> Self {
        let mut errors = Self::default();
        errors.add("slug", format!("{slug}{WARNING}"));
        errors
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::default();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                form_errors.add(field.to_string(), message);
            }
        }
        form_errors
    }
}

fn validation_errors(fields: &impl Validate) -> FormErrors {
    fields.validate().err().map(FormErrors::from).unwrap_or_default()
}

// Blank submissions become `None` so `required` and optional rules apply.
fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Raw note submission as posted by the add and edit forms.
#[derive(Debug, Clone, Default, FromForm)]
pub struct NoteInput {
    #[field(default = String::new())]
    pub title: String,
    #[field(default = String::new())]
    pub text: String,
    #[field(default = String::new())]
    pub slug: String,
}

impl From<&Note> for NoteInput {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
        }
    }
}

#[derive(Debug, Validate)]
struct NoteFields {
    #[validate(
        required(message = "This field is required."),
        length(max = 100, message = "Ensure this value has at most 100 characters.")
    )]
    title: Option<String>,

    #[validate(required(message = "This field is required."))]
    text: Option<String>,

    #[validate(
        length(max = 100, message = "Ensure this value has at most 100 characters."),
        regex(
            path = *SLUG_REGEX,
            message = "Enter a valid slug consisting of letters, numbers, underscores or hyphens."
        )
    )]
    slug: Option<String>,
}

/// A note submission that passed field validation. Slug uniqueness is
/// checked against the store separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl NoteInput {
    pub fn to_draft(&self) -> Result<NoteDraft, FormErrors> {
        let fields = NoteFields {
            title: non_blank(&self.title),
            text: non_blank(&self.text),
            slug: non_blank(&self.slug),
        };
        let mut errors = validation_errors(&fields);

        let title = fields.title.unwrap_or_default();
        let slug = match fields.slug {
            Some(slug) => slug,
            None => {
                let derived = slugify(&title);
                if derived.is_empty() && !title.is_empty() {
                    errors.add("slug", INVALID_SLUG);
                }
                derived
            }
        };

        errors.into_result(NoteDraft {
            title,
            text: fields.text.unwrap_or_default(),
            slug,
        })
    }
}

#[derive(Debug, Clone, Default, FromForm)]
pub struct SignupInput {
    #[field(default = String::new())]
    pub username: String,
    #[field(default = String::new())]
    pub password1: String,
    #[field(default = String::new())]
    pub password2: String,
}

#[derive(Debug, Validate)]
struct SignupFields {
    #[validate(
        required(message = "This field is required."),
        length(max = 150, message = "Ensure this value has at most 150 characters."),
        regex(
            path = *USERNAME_REGEX,
            message = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
        )
    )]
    username: Option<String>,

    #[validate(required(message = "This field is required."))]
    password1: Option<String>,

    #[validate(
        required(message = "This field is required."),
        length(
            min = 8,
            message = "This password is too short. It must contain at least 8 characters."
        ),
        regex(path = *NOT_NUMERIC_REGEX, message = "This password is entirely numeric.")
    )]
    password2: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub username: String,
    pub password: String,
}

impl SignupInput {
    pub fn to_signup(&self) -> Result<Signup, FormErrors> {
        // Passwords are taken verbatim; only the username is trimmed.
        let fields = SignupFields {
            username: non_blank(&self.username),
            password1: (!self.password1.is_empty()).then(|| self.password1.clone()),
            password2: (!self.password2.is_empty()).then(|| self.password2.clone()),
        };
        let mut errors = validation_errors(&fields);

        // A mismatch replaces the strength errors on the confirmation field.
        if fields.password1.is_some()
            && fields.password2.is_some()
            && fields.password1 != fields.password2
        {
            errors.fields.remove("password2");
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.into_result(Signup {
            username: fields.username.unwrap_or_default(),
            password: fields.password1.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, FromForm)]
pub struct LoginInput {
    #[field(default = String::new())]
    pub username: String,
    #[field(default = String::new())]
    pub password: String,
    pub next: Option<String>,
}
