#[macro_use]
extern crate rocket;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod fairing;
pub mod forms;
pub mod models;
pub mod notes;
pub mod slug;
pub mod users;
pub mod views;

use rocket::{Build, Rocket};
use sqlx::SqlitePool;

/// Assemble the notes service around an already migrated pool.
pub fn rocket(pool: SqlitePool) -> Rocket<Build> {
    rocket::build()
        .attach(fairing::RequestLogger)
        .manage(pool)
        .mount("/", notes::routes())
        .mount("/", users::routes())
        .register("/", catchers![auth::login_required])
}
