use crate::{
    routes::{
        index::get_index_route,
        roster::{
            internal_get_confirm, internal_get_message, internal_get_roster,
            internal_post_confirm, internal_post_refresh, internal_post_roster_click,
        },
        sse::sse_feed,
        students::internal_put_student,
    },
    state::RosterState,
};
use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

pub mod index;
pub mod roster;
pub mod sse;
pub mod students;

pub fn router(state: RosterState) -> Router {
    let trace_layer = TraceLayer::new_for_http();

    Router::new()
        .route("/", get(get_index_route))
        .route("/internal/roster", get(internal_get_roster))
        .route("/internal/roster/refresh", post(internal_post_refresh))
        .route("/internal/roster/click", post(internal_post_roster_click))
        .route("/internal/students", put(internal_put_student))
        .route(
            "/internal/confirm",
            get(internal_get_confirm).post(internal_post_confirm),
        )
        .route("/internal/message", get(internal_get_message))
        .route("/sse_feed", get(sse_feed))
        .layer(trace_layer)
        .with_state(state)
}
