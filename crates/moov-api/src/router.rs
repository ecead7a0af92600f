use axum::{Router, middleware, routing::get};

use crate::{AppState, auth, events, messages, session, venues};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(messages::home))
        .route("/venues", get(venues::list_venues))
        .route("/search", get(venues::search_page).post(venues::search))
        .route("/purchase", get(events::purchase_page).post(events::purchase))
        .route("/host", get(events::host_page).post(events::host))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/profile", get(auth::profile))
        .route(
            "/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::load_session,
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
