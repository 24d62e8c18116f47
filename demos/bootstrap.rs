#![allow(clippy::print_stdout, clippy::unwrap_used, clippy::expect_used)]

//! Startup Example
//!
//! Restores the session persisted in a directory, prints which navigation
//! stack to show and, when signed in, today's calorie total.
//!
//! Run with: `cargo run --example bootstrap -- /tmp/nutritrack`
//!
//! The backend URL comes from `NUTRITRACK_API_URL` (default
//! `http://localhost:8000/api`). Sign in once with `NUTRITRACK_EMAIL` and
//! `NUTRITRACK_PASSWORD` set; later runs restore that session from disk.

use std::env;
use std::sync::Arc;

use nutritrack::config::ClientConfig;
use nutritrack::validators::LoginForm;
use nutritrack::{AppContext, FileKeyValueStore, Route};

#[tokio::main]
async fn main() {
    let directory = env::args().nth(1).unwrap_or_else(|| "nutritrack-data".to_owned());
    let storage = Arc::new(FileKeyValueStore::new(&directory).expect("storage directory"));
    let ctx = AppContext::create(ClientConfig::from_env(), storage).expect("http client");

    let session = ctx.bootstrap().await;
    println!("restored session: authenticated={}", session.is_authenticated);

    if ctx.route() == Route::Auth {
        let credentials = (env::var("NUTRITRACK_EMAIL"), env::var("NUTRITRACK_PASSWORD"));
        if let (Ok(email), Ok(password)) = credentials {
            match ctx.login(&LoginForm::new(email, password)).await {
                Ok(user) => println!("signed in as {}", user.email),
                Err(e) => println!("login failed: {}", e.message()),
            }
        }
    }

    let route = ctx.route();
    println!("route: {route:?} screens: {:?}", route.screens());

    if ctx.session().is_authenticated() {
        match ctx.queries().today_log().await {
            Ok(log) => println!("today: {:.0} kcal", log.total_calories),
            Err(e) => println!("could not load today's log: {}", e.message()),
        }
    }
}
