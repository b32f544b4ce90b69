use crate::{
    api::{HttpStudentsApi, StudentsApi},
    client::RosterClient,
    config::RuntimeConfiguration,
    error::RosterResult,
    view::{ViewChange, ViewHandle},
};
use maud::{DOCTYPE, Markup, html};
use std::{ops::Deref, sync::Arc};
use tokio::sync::broadcast::Receiver;

#[derive(Clone, Debug)]
pub struct RosterState {
    config: RuntimeConfiguration,
    client: Arc<RosterClient<HttpStudentsApi>>,
}

impl RosterState {
    pub fn new(config: RuntimeConfiguration) -> RosterResult<Self> {
        let api = HttpStudentsApi::new(config.api_config())?;
        let client = RosterClient::new(api, ViewHandle::new(), config.message_dismiss_after());

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://unpkg.com/htmx-ext-sse@2.2.3" integrity="sha384-Y4gc0CK6Kg+hmulDc6rZPJu0tqvk7EWlih0Oh+2OkAi1ZDlCbBDCQEE2uVk472Ky" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Student Roster" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center justify-center text-white" {
                    (markup)
                }
            }
        }
    }

    /// Logs whether the backend answers, without failing startup if it doesn't.
    pub async fn probe_backend(&self) {
        match self.client.api().health().await {
            Ok(()) => info!("Student backend is reachable"),
            Err(e) => warn!(?e, "Student backend is not reachable yet"),
        }
    }

    pub fn subscribe_to_view_changes(&self) -> Receiver<ViewChange> {
        self.client.view().subscribe()
    }

    pub async fn sensible_shutdown(&self) {
        self.client.shutdown().await;
    }
}

impl Deref for RosterState {
    type Target = RosterClient<HttpStudentsApi>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}
