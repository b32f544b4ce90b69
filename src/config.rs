use crate::{
    config::date_locale::DateLocaleConfig,
    error::{BadEnvVarSnafu, ParseNumberSnafu, RosterResult},
};
use dotenvy::var;
use snafu::ResultExt;
use std::{env::VarError, sync::Arc, time::Duration};

pub mod date_locale;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    api_config: Arc<ApiConfig>,
    date_locale_config: Arc<DateLocaleConfig>,
    server_ip: String,
    message_dismiss_after: Duration,
}

impl RuntimeConfiguration {
    pub fn new() -> RosterResult<Self> {
        let date_locale_config = DateLocaleConfig::new(
            var_or("ROSTER_TIMEZONE", "UTC")?,
            var_or("ROSTER_LOCALE", "en-US")?,
        )?;

        Ok(Self {
            api_config: Arc::new(ApiConfig::new()?),
            date_locale_config: Arc::new(date_locale_config),
            server_ip: var_or("ROSTER_SERVER_IP", DEFAULT_SERVER_IP)?,
            message_dismiss_after: Duration::from_secs(secs_var_or(
                "ROSTER_MESSAGE_DISMISS_SECS",
                4,
            )?),
        })
    }

    #[cfg(test)]
    pub fn for_tests(base_url: &str) -> Self {
        Self {
            api_config: Arc::new(ApiConfig::with_base_url(base_url, Duration::from_secs(5))),
            date_locale_config: Arc::new(DateLocaleConfig::utc_en_us()),
            server_ip: "127.0.0.1:0".to_string(),
            message_dismiss_after: Duration::from_secs(4),
        }
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub fn date_locale_config(&self) -> Arc<DateLocaleConfig> {
        self.date_locale_config.clone()
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }

    pub const fn message_dismiss_after(&self) -> Duration {
        self.message_dismiss_after
    }
}

/// Where the student backend lives, and how long to wait on it.
#[derive(Debug)]
pub struct ApiConfig {
    base_url: String,
    request_timeout: Duration,
}

impl ApiConfig {
    pub fn new() -> RosterResult<Self> {
        Ok(Self::with_base_url(
            &var_or("ROSTER_API_URL", DEFAULT_API_URL)?,
            Duration::from_secs(secs_var_or("ROSTER_REQUEST_TIMEOUT_SECS", 10)?),
        ))
    }

    pub fn with_base_url(base_url: &str, request_timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        }
    }

    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn root_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    pub fn students_url(&self) -> String {
        format!("{}/students", self.base_url)
    }

    ///the backend only routes creation on the trailing-slash form
    pub fn create_student_url(&self) -> String {
        format!("{}/students/", self.base_url)
    }

    pub fn student_url(&self, id: i64) -> String {
        format!("{}/students/{id}", self.base_url)
    }
}

fn var_or(name: &'static str, default: &str) -> RosterResult<String> {
    match var(name) {
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(default.to_string()),
        other => other.context(BadEnvVarSnafu { name }),
    }
}

fn secs_var_or(name: &'static str, default: u64) -> RosterResult<u64> {
    let provided = var_or(name, &default.to_string())?;
    provided
        .trim()
        .parse()
        .context(ParseNumberSnafu { name, provided })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_a_trimmed_base() {
        let config = ApiConfig::with_base_url("http://backend:8000/", Duration::from_secs(1));

        assert_eq!(config.root_url(), "http://backend:8000/");
        assert_eq!(config.students_url(), "http://backend:8000/students");
        assert_eq!(config.create_student_url(), "http://backend:8000/students/");
        assert_eq!(config.student_url(42), "http://backend:8000/students/42");
    }
}
