use crate::{
    client::SubmitOutcome, data::student::DraftForm, render::student_form, state::RosterState,
};
use axum::{Form, extract::State};
use maud::Markup;

/// Submits the add-student form, answering with the form to show next.
pub async fn internal_put_student(
    State(state): State<RosterState>,
    Form(form): Form<DraftForm>,
) -> Markup {
    match state.submit(&form).await {
        SubmitOutcome::Created => student_form(&DraftForm::default()),
        SubmitOutcome::NotCreated | SubmitOutcome::Busy => student_form(&form),
    }
}
