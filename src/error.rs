use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse `{}` from {:?}", name, provided))]
    ParseNumber {
        source: ParseIntError,
        name: &'static str,
        provided: String,
    },
    #[snafu(display("Invalid timezone {:?}", tz))]
    InvalidTimezone { source: jiff::Error, tz: String },
    #[snafu(display("Invalid locale {:?}", provided))]
    InvalidLocale {
        source: icu::locale::ParseError,
        provided: String,
    },
    #[snafu(display("Unable to create date formatter"))]
    BadDateTimeFormatter {
        source: icu::datetime::DateTimeFormatterLoadError,
    },
    #[snafu(display("Unable to build HTTP client"))]
    BuildHttpClient { source: reqwest::Error },
    #[snafu(display("Unable to listen on {}", address))]
    BindListener {
        source: std::io::Error,
        address: String,
    },
    #[snafu(display("Error serving app"))]
    Serve { source: std::io::Error },
    #[snafu(display("Unable to reach the backend"))]
    Transport { source: reqwest::Error },
    #[snafu(display("Unable to decode students from the backend"))]
    DecodeStudents { source: reqwest::Error },
    #[snafu(display("Server error: {}", status.as_u16()))]
    ListStatus { status: StatusCode },
    #[snafu(display("{}", detail))]
    CreateRejected { status: StatusCode, detail: String },
    #[snafu(display("Failed to delete student (status {})", status.as_u16()))]
    DeleteStatus { status: StatusCode },
    #[snafu(display("Backend health check returned {}", status.as_u16()))]
    HealthStatus { status: StatusCode },
    #[snafu(display("Unable to parse student id {:?}", provided))]
    ParseStudentId {
        source: ParseIntError,
        provided: String,
    },
    #[snafu(display("Expected a yes/no answer, found {:?}", provided))]
    InvalidAnswer { provided: String },
}

impl IntoResponse for RosterError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //backend misbehaved
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Roster Error "}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::BadEnvVar { .. } | Self::ParseNumber { .. } => ISE,
            Self::InvalidTimezone { .. } | Self::InvalidLocale { .. } => ISE,
            Self::BadDateTimeFormatter { .. } => ISE,
            Self::BuildHttpClient { .. } => ISE,
            Self::BindListener { .. } | Self::Serve { .. } => ISE,
            Self::Transport { .. } | Self::DecodeStudents { .. } => BG,
            Self::ListStatus { .. } | Self::CreateRejected { .. } => BG,
            Self::DeleteStatus { .. } | Self::HealthStatus { .. } => BG,
            Self::ParseStudentId { .. } => BI,
            Self::InvalidAnswer { .. } => BI,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()).into_string())).into_response()
    }
}
