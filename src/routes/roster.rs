use crate::{
    client::RosterEvent,
    data::student::StudentId,
    error::{InvalidAnswerSnafu, ParseStudentIdSnafu, RosterResult},
    render::{confirm_prompt, list_region, status_message},
    state::RosterState,
};
use axum::{Form, extract::State, http::StatusCode};
use maud::Markup;
use serde::Deserialize;
use snafu::ResultExt;

pub async fn internal_get_roster(State(state): State<RosterState>) -> RosterResult<Markup> {
    let view = state.view().snapshot().await;
    let date_locale = state.config().date_locale_config();
    let dates = date_locale.created_at_formatter()?;

    Ok(list_region(&view.list, &dates))
}

pub async fn internal_post_refresh(State(state): State<RosterState>) -> StatusCode {
    state.dispatch(RosterEvent::Refresh).await;
    StatusCode::NO_CONTENT
}

fn parse_student_id(provided: String) -> RosterResult<StudentId> {
    provided
        .trim()
        .parse()
        .context(ParseStudentIdSnafu { provided })
}

#[derive(Deserialize)]
pub struct RosterClickForm {
    student_id: String,
}

/// Every click on a delete button in the list lands here.
pub async fn internal_post_roster_click(
    State(state): State<RosterState>,
    Form(RosterClickForm { student_id }): Form<RosterClickForm>,
) -> RosterResult<StatusCode> {
    let id = parse_student_id(student_id)?;

    state.dispatch(RosterEvent::DeleteClicked(id)).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn internal_get_confirm(State(state): State<RosterState>) -> Markup {
    confirm_prompt(state.view().snapshot().await.pending_delete)
}

#[derive(Deserialize)]
pub struct ConfirmForm {
    student_id: String,
    answer: String,
}

pub async fn internal_post_confirm(
    State(state): State<RosterState>,
    Form(ConfirmForm { student_id, answer }): Form<ConfirmForm>,
) -> RosterResult<StatusCode> {
    let id = parse_student_id(student_id)?;
    let confirmed = match answer.as_str() {
        "yes" => true,
        "no" => false,
        _ => return InvalidAnswerSnafu { provided: answer }.fail(),
    };

    state
        .dispatch(RosterEvent::AnswerDelete { id, confirmed })
        .await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn internal_get_message(State(state): State<RosterState>) -> Markup {
    status_message(state.view().snapshot().await.message.as_ref())
}
