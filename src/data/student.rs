use serde::{Deserialize, Serialize};

pub type StudentId = i64;

/// A student as the backend returns it. `id` and `created_at` are only ever server-assigned.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub created_at: String,
}

/// The body of a create request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// The raw values of the add-student form, exactly as the browser sent them.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DraftRejection {
    EmptyName,
    EmptyEmail,
    InvalidAge,
}

impl DraftForm {
    pub fn validate(&self) -> Result<StudentDraft, DraftRejection> {
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() {
            return Err(DraftRejection::EmptyName);
        }
        if email.is_empty() {
            return Err(DraftRejection::EmptyEmail);
        }
        let Ok(age) = self.age.trim().parse() else {
            return Err(DraftRejection::InvalidAge);
        };

        Ok(StudentDraft {
            name: name.to_string(),
            email: email.to_string(),
            age,
        })
    }
}
