use crate::{render::roster_page, state::RosterState};
use axum::extract::State;
use maud::Markup;

pub async fn get_index_route(State(state): State<RosterState>) -> Markup {
    state.render(roster_page())
}
