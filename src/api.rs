use crate::{
    config::ApiConfig,
    data::student::{Student, StudentDraft, StudentId},
    error::{
        BuildHttpClientSnafu, DecodeStudentsSnafu, RosterError, RosterResult, TransportSnafu,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use snafu::ResultExt;
use std::sync::Arc;

/// The student REST backend, as far as the roster needs it.
#[async_trait]
pub trait StudentsApi: Send + Sync + 'static {
    async fn list_students(&self) -> RosterResult<Vec<Student>>;
    async fn create_student(&self, draft: &StudentDraft) -> RosterResult<()>;
    async fn delete_student(&self, id: StudentId) -> RosterResult<()>;
    async fn health(&self) -> RosterResult<()>;
}

#[derive(Clone, Debug)]
pub struct HttpStudentsApi {
    client: Client,
    config: Arc<ApiConfig>,
}

impl HttpStudentsApi {
    pub fn new(config: Arc<ApiConfig>) -> RosterResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context(BuildHttpClientSnafu)?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl StudentsApi for HttpStudentsApi {
    async fn list_students(&self) -> RosterResult<Vec<Student>> {
        let rsp = self
            .client
            .get(self.config.students_url())
            .send()
            .await
            .context(TransportSnafu)?;

        let status = rsp.status();
        if !status.is_success() {
            return Err(RosterError::ListStatus { status });
        }

        rsp.json().await.context(DecodeStudentsSnafu)
    }

    async fn create_student(&self, draft: &StudentDraft) -> RosterResult<()> {
        let rsp = self
            .client
            .post(self.config.create_student_url())
            .json(draft)
            .send()
            .await
            .context(TransportSnafu)?;

        let status = rsp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = rsp.json::<ErrorBody>().await.ok();
        Err(RosterError::CreateRejected {
            status,
            detail: describe_detail(body.as_ref().and_then(|body| body.detail.as_ref())),
        })
    }

    async fn delete_student(&self, id: StudentId) -> RosterResult<()> {
        let rsp = self
            .client
            .delete(self.config.student_url(id))
            .send()
            .await
            .context(TransportSnafu)?;

        let status = rsp.status();
        if !status.is_success() {
            return Err(RosterError::DeleteStatus { status });
        }
        Ok(())
    }

    async fn health(&self) -> RosterResult<()> {
        let rsp = self
            .client
            .get(self.config.root_url())
            .send()
            .await
            .context(TransportSnafu)?;

        let status = rsp.status();
        if !status.is_success() {
            return Err(RosterError::HealthStatus { status });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

const CREATE_FALLBACK: &str = "Failed to add student";

/// Turns the backend's `detail` into something to show the user.
///
/// A string is used as-is, and a list of validation errors has its `msg`s joined.
fn describe_detail(detail: Option<&Value>) -> String {
    match detail {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                CREATE_FALLBACK.to_string()
            } else {
                msgs.join(", ")
            }
        }
        _ => CREATE_FALLBACK.to_string(),
    }
}
