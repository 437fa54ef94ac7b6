use noteapp::db;
use noteapp::error::AppError;
use noteapp::forms::NoteDraft;

use crate::helpers::spawn_app;

fn draft(title: &str, slug: &str) -> NoteDraft {
    NoteDraft {
        title: title.to_string(),
        text: "Текст".to_string(),
        slug: slug.to_string(),
    }
}

#[rocket::async_test]
async fn create_note_with_taken_slug_is_slug_taken() {
    let app = spawn_app().await;
    let author = app.create_user("Автор").await;
    let reader = app.create_user("Не автор").await;
    app.create_note(&author, "Заголовок", "Текст", "dup").await;

    // Uniqueness spans all authors, so the store rejects either of them.
    for user_id in [author.id, reader.id] {
        let result = db::create_note(&app.pool, user_id, &draft("Другой", "dup")).await;
        assert!(
            matches!(&result, Err(AppError::SlugTaken(slug)) if slug == "dup"),
            "unexpected result: {result:?}"
        );
    }

    assert_eq!(app.note_count().await, 1);
}

#[rocket::async_test]
async fn update_note_to_taken_slug_is_slug_taken() {
    let app = spawn_app().await;
    let author = app.create_user("Автор").await;
    app.create_note(&author, "Заголовок", "Текст", "dup").await;
    let other = app.create_note(&author, "Второй", "Текст", "other").await;

    let result = db::update_note(&app.pool, author.id, other.id, &draft("Второй", "dup")).await;
    assert!(
        matches!(&result, Err(AppError::SlugTaken(slug)) if slug == "dup"),
        "unexpected result: {result:?}"
    );

    assert_eq!(app.note(other.id).await, Some(other));
}
