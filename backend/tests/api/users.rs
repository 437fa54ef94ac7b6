use rocket::http::{ContentType, Status};

use crate::helpers::{assert_is_redirect_to, form_body, login_redirect, spawn_app, TEST_PASSWORD};

#[rocket::async_test]
async fn signup_login_and_logout() {
    let app = spawn_app().await;
    let client = app.client().await;

    let response = client
        .post("/auth/signup")
        .header(ContentType::Form)
        .body(form_body(&[
            ("username", "newcomer"),
            ("password1", "long enough pass"),
            ("password2", "long enough pass"),
        ]))
        .dispatch()
        .await;
    assert_is_redirect_to(&response, "/auth/login");

    let response = client
        .post("/auth/login")
        .header(ContentType::Form)
        .body(form_body(&[
            ("username", "newcomer"),
            ("password", "long enough pass"),
        ]))
        .dispatch()
        .await;
    assert_is_redirect_to(&response, "/notes");

    let response = client.get("/notes").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let response = client.get("/auth/logout").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let response = client.get("/notes").dispatch().await;
    assert_is_redirect_to(&response, &login_redirect("/notes"));
}

#[rocket::async_test]
async fn login_returns_to_next_page() {
    let app = spawn_app().await;
    let user = app.create_user("Автор").await;
    let client = app.client().await;

    let page = client
        .get("/auth/login?next=/add")
        .dispatch()
        .await
        .into_string()
        .await
        .unwrap();
    assert!(page.contains(r#"<input type="hidden" name="next" value="/add">"#));

    let response = client
        .post("/auth/login")
        .header(ContentType::Form)
        .body(form_body(&[
            ("username", user.username.as_str()),
            ("password", TEST_PASSWORD),
            ("next", "/add"),
        ]))
        .dispatch()
        .await;
    assert_is_redirect_to(&response, "/add");

    let response = client.get("/add").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
}

#[rocket::async_test]
async fn login_round_trip_keeps_percent_encoded_path() {
    let app = spawn_app().await;
    let user = app.create_user("Автор").await;
    let client = app.client().await;

    let response = client.get("/note/%D0%B0").dispatch().await;
    assert_is_redirect_to(&response, "/auth/login?next=/note/%25D0%25B0");

    let page = client
        .get("/auth/login?next=/note/%25D0%25B0")
        .dispatch()
        .await
        .into_string()
        .await
        .unwrap();
    assert!(page.contains(r#"<input type="hidden" name="next" value="/note/%D0%B0">"#));

    // A browser escapes the hidden value again when posting the form.
    let response = client
        .post("/auth/login")
        .header(ContentType::Form)
        .body(format!(
            "username={}&password={}&next=%2Fnote%2F%25D0%25B0",
            user.username, TEST_PASSWORD
        ))
        .dispatch()
        .await;
    assert_is_redirect_to(&response, "/note/%D0%B0");

    // Logged in now; the note simply does not exist.
    let response = client.get("/note/%D0%B0").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn login_with_decoded_next_redirects_to_a_valid_uri() {
    let app = spawn_app().await;
    let user = app.create_user("reader").await;
    let client = app.client().await;

    for (next, location) in [
        ("/note/%D0%B0", "/note/%D0%B0"),
        ("/note/a%20b", "/note/a%20b"),
        ("/notes%3Fpage%3D2", "/notes?page=2"),
    ] {
        let response = client
            .post("/auth/login")
            .header(ContentType::Form)
            .body(format!(
                "username={}&password={}&next={next}",
                user.username, TEST_PASSWORD
            ))
            .dispatch()
            .await;
        assert_is_redirect_to(&response, location);
    }
}

#[rocket::async_test]
async fn login_with_foreign_next_goes_to_notes() {
    let app = spawn_app().await;
    let user = app.create_user("reader").await;
    let client = app.client().await;

    let response = client
        .post("/auth/login")
        .header(ContentType::Form)
        .body(form_body(&[
            ("username", user.username.as_str()),
            ("password", TEST_PASSWORD),
            ("next", "https://evil.example/"),
        ]))
        .dispatch()
        .await;
    assert_is_redirect_to(&response, "/notes");
}

#[rocket::async_test]
async fn login_with_wrong_password_is_rejected() {
    let app = spawn_app().await;
    app.create_user("reader").await;
    let client = app.client().await;

    let response = client
        .post("/auth/login")
        .header(ContentType::Form)
        .body(form_body(&[("username", "reader"), ("password", "not it")]))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let page = response.into_string().await.unwrap();
    assert!(page.contains("Please enter a correct username and password."));

    let response = client.get("/notes").dispatch().await;
    assert_is_redirect_to(&response, &login_redirect("/notes"));
}

#[rocket::async_test]
async fn signup_with_taken_username_is_rejected() {
    let app = spawn_app().await;
    app.create_user("reader").await;
    let client = app.client().await;

    let response = client
        .post("/auth/signup")
        .header(ContentType::Form)
        .body(form_body(&[
            ("username", "reader"),
            ("password1", "long enough pass"),
            ("password2", "long enough pass"),
        ]))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let page = response.into_string().await.unwrap();
    assert!(page.contains(
        r#"<li class="error" data-field="username">A user with that username already exists.</li>"#
    ));
}

#[rocket::async_test]
async fn signup_with_mismatched_passwords_is_rejected() {
    let app = spawn_app().await;
    let client = app.client().await;

    let response = client
        .post("/auth/signup")
        .header(ContentType::Form)
        .body(form_body(&[
            ("username", "newcomer"),
            ("password1", "long enough pass"),
            ("password2", "different pass"),
        ]))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let page = response.into_string().await.unwrap();
    assert!(page.contains("The two password fields didn&#x27;t match."));
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(users, 0);
}
