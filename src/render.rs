use crate::{
    config::date_locale::CreatedAtFormatter,
    data::student::{DraftForm, Student, StudentId},
    maud_conveniences::{form_submit_button, simple_form_element, title},
    view::{ListRegion, MessageKind, StatusMessage},
};
use maud::{Markup, html};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this student?";

///sends the id of whichever delete button was clicked, see `roster_page`
const CLICK_VALS: &str =
    "js:{student_id: event.target.closest('[data-student-id]').dataset.studentId}";

pub fn roster_page() -> Markup {
    html! {
        div hx-ext="sse" sse-connect="/sse_feed" class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full flex flex-col space-y-4" {
            (title("Student Roster"))
            (student_form(&DraftForm::default()))
            div id="form-message" hx-get="/internal/message" hx-trigger="load, sse:message" {}

            div class="flex flex-row items-center justify-between" {
                h2 class="text-xl font-semibold" {"Students"}
                button id="refresh-btn" type="button" hx-post="/internal/roster/refresh" hx-swap="none" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {
                    "🔄 Refresh"
                }
            }

            //one listener for every delete button in the list
            div id="roster" hx-post="/internal/roster/click" hx-trigger="click[target.closest('[data-student-id]')]" hx-vals=(CLICK_VALS) hx-swap="none" hx-disinherit="*" {
                div id="student-list" hx-get="/internal/roster" hx-trigger="load, sse:roster" class="flex flex-col space-y-4" {}
            }

            div id="confirm-dialog" hx-get="/internal/confirm" hx-trigger="load, sse:confirm" {}
            div hx-post="/internal/roster/refresh" hx-trigger="load" hx-swap="none" {}
        }
    }
}

pub fn student_form(values: &DraftForm) -> Markup {
    html! {
        form id="student-form" hx-put="/internal/students" hx-trigger="submit" hx-swap="outerHTML" hx-disabled-elt="find button" class="p-4" {
            (simple_form_element("name", "Name", None, &values.name))
            (simple_form_element("email", "Email", None, &values.email))
            (simple_form_element("age", "Age", Some("number"), &values.age))
            (form_submit_button(Some("➕ Add Student")))
        }
    }
}

pub fn list_region(region: &ListRegion, dates: &CreatedAtFormatter<'_>) -> Markup {
    match region {
        ListRegion::Loading => html! {
            p class="loading text-gray-300" {"⏳ Loading students..."}
        },
        ListRegion::Failed => html! {
            p class="error text-red-400" {"❌ Failed to load students. Is the backend running?"}
        },
        ListRegion::Loaded(students) => roster(students, dates),
    }
}

/// One card per student, in the order given.
pub fn roster(students: &[Student], dates: &CreatedAtFormatter<'_>) -> Markup {
    if students.is_empty() {
        return html! {
            p class="empty-state text-gray-300" {"📭 No students found. Add one above!"}
        };
    }

    html! {
        @for student in students {
            (student_card(student, dates))
        }
    }
}

pub fn student_card(student: &Student, dates: &CreatedAtFormatter<'_>) -> Markup {
    html! {
        div class="student-card flex flex-row items-center justify-between rounded-lg shadow-md p-4 bg-gray-700" {
            div class="student-info" {
                h3 class="text-lg font-semibold" {(student.name)}
                p {"📧 " (student.email)}
                p {"🎂 Age: " (student.age)}
                p class="date text-sm text-gray-400" {"Added: " (dates.format(&student.created_at))}
            }
            button type="button" data-student-id=(student.id) class="btn btn-danger bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" {
                "🗑️ Delete"
            }
        }
    }
}

pub fn status_message(message: Option<&StatusMessage>) -> Markup {
    let Some(message) = message else {
        return html! {
            div class="message hidden" {}
        };
    };

    let (icon, colours) = match message.kind {
        MessageKind::Success => ("✅", "bg-green-100 border-green-400 text-green-700"),
        MessageKind::Error => ("❌", "bg-red-100 border-red-400 text-red-700"),
    };

    html! {
        div class={"message " (message.kind.class()) " border px-4 py-3 rounded " (colours)} role="status" {
            (icon) " " (message.text)
        }
    }
}

///each answer names the student its prompt was showing
fn answer_vals(id: StudentId, answer: &str) -> String {
    format!("{{\"student_id\": \"{id}\", \"answer\": \"{answer}\"}}")
}

pub fn confirm_prompt(pending: Option<StudentId>) -> Markup {
    let Some(id) = pending else {
        return html! {};
    };

    html! {
        div class="fixed inset-0 bg-black/50 flex items-center justify-center" role="dialog" aria-modal="true" {
            div class="bg-gray-800 p-6 rounded shadow-md max-w-sm w-full" data-pending-student-id=(id) {
                p class="mb-4" {(DELETE_PROMPT)}
                div class="flex flex-row justify-end space-x-4" {
                    button type="button" hx-post="/internal/confirm" hx-vals=(answer_vals(id, "no")) hx-swap="none" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {
                        "Cancel"
                    }
                    button type="button" hx-post="/internal/confirm" hx-vals=(answer_vals(id, "yes")) hx-swap="none" class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" {
                        "Delete"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::tests::ann, config::date_locale::DateLocaleConfig};

    fn render_with(students: &[Student]) -> (String, String) {
        let config = DateLocaleConfig::utc_en_us();
        let dates = config.created_at_formatter().expect("formatter loads");
        let expected_date = dates.format("2024-01-01T00:00:00Z");
        (roster(students, &dates).into_string(), expected_date)
    }

    #[test]
    fn empty_roster_shows_the_empty_state() {
        let (html, _) = render_with(&[]);

        assert!(html.contains("No students found"));
        assert!(!html.contains("student-card"));
    }

    #[test]
    fn one_card_per_student_in_order() {
        let students: Vec<Student> = (1..=3)
            .map(|id| Student {
                id,
                name: format!("Student {id}"),
                ..ann()
            })
            .collect();

        let (html, _) = render_with(&students);

        assert_eq!(html.matches(r#"class="student-card"#).count(), 3);
        let first = html.find("Student 1").expect("first");
        let third = html.find("Student 3").expect("third");
        assert!(first < third);
        assert!(!html.contains("No students found"));
    }

    #[test]
    fn single_student_card_shows_everything() {
        let (html, expected_date) = render_with(&[ann()]);

        assert_eq!(html.matches(r#"class="student-card"#).count(), 1);
        assert!(html.contains("Ann"));
        assert!(html.contains("a@x.com"));
        assert!(html.contains("Age: 20"));
        assert!(html.contains(&format!("Added: {expected_date}")));
        assert!(expected_date.contains("2024"));
        assert!(html.contains(r#"data-student-id="1""#));
    }

    #[test]
    fn markup_in_text_fields_is_escaped() {
        let student = Student {
            name: "<script>alert('hi')</script>".to_string(),
            email: "\"><img src=x onerror=alert(1)>".to_string(),
            ..ann()
        };

        let (html, _) = render_with(&[student]);

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;img"));
    }

    #[test]
    fn list_region_states() {
        let config = DateLocaleConfig::utc_en_us();
        let dates = config.created_at_formatter().expect("formatter loads");

        assert!(
            list_region(&ListRegion::Loading, &dates)
                .into_string()
                .contains("Loading students")
        );
        assert!(
            list_region(&ListRegion::Failed, &dates)
                .into_string()
                .contains("Failed to load students")
        );
    }

    #[test]
    fn status_messages_carry_their_kind() {
        assert!(status_message(None).into_string().contains("hidden"));

        let html = status_message(Some(&StatusMessage {
            text: "Student added successfully!".to_string(),
            kind: MessageKind::Success,
            generation: 1,
        }))
        .into_string();
        assert!(html.contains(r#"class="message success"#));
        assert!(html.contains("Student added successfully!"));

        let html = status_message(Some(&StatusMessage {
            text: "<b>nope</b>".to_string(),
            kind: MessageKind::Error,
            generation: 2,
        }))
        .into_string();
        assert!(html.contains(r#"class="message error"#));
        assert!(html.contains("&lt;b&gt;nope"));
    }

    #[test]
    fn confirmation_prompt_only_while_pending() {
        assert!(confirm_prompt(None).into_string().is_empty());

        let html = confirm_prompt(Some(5)).into_string();
        assert!(html.contains(DELETE_PROMPT));
        assert!(html.contains(r#"data-pending-student-id="5""#));
        assert!(html.contains(
            "{&quot;student_id&quot;: &quot;5&quot;, &quot;answer&quot;: &quot;yes&quot;}"
        ));
        assert!(html.contains(
            "{&quot;student_id&quot;: &quot;5&quot;, &quot;answer&quot;: &quot;no&quot;}"
        ));
    }

    #[test]
    fn rejected_forms_keep_their_values() {
        let html = student_form(&DraftForm {
            name: "Ann".to_string(),
            email: String::new(),
            age: "abc".to_string(),
        })
        .into_string();

        assert!(html.contains(r#"value="Ann""#));
        assert!(html.contains(r#"value="abc""#));
    }
}
