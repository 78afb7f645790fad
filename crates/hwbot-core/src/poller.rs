//! One poll → validate → format → notify cycle.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    clock::{self, Clock},
    config::{Config, Credentials},
    domain::Cursor,
    errors::Error,
    homework::{self, HomeworkStatus},
    messaging::port::MessagingPort,
    notifier::Notifier,
    ports::HomeworkApi,
    scheduler::RepeatingTask,
};

/// What a single cycle did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A required secret was absent or unusable; the API was not called.
    MissingCredentials,
    /// The fetch failed; the error was logged and nothing was sent.
    NoData,
    /// The payload had an empty `homeworks` list.
    NoUpdates,
    /// A status notification was attempted.
    Notified {
        status: HomeworkStatus,
        delivered: bool,
    },
    /// Validation or formatting failed and a failure alert was attempted.
    Failed { error: String, alerted: bool },
}

pub struct Poller {
    cfg: Arc<Config>,
    api: Arc<dyn HomeworkApi>,
    messenger: Arc<dyn MessagingPort>,
    clock: Arc<dyn Clock>,
    cursor: Cursor,
}

impl Poller {
    /// The cursor starts at "now", so only changes after startup are reported.
    pub fn new(
        cfg: Arc<Config>,
        api: Arc<dyn HomeworkApi>,
        messenger: Arc<dyn MessagingPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cursor = clock.cursor();
        Self {
            cfg,
            api,
            messenger,
            clock,
            cursor,
        }
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Run one cycle. The cursor advances to "now" whatever the outcome.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let outcome = match self.cfg.credentials() {
            Ok(creds) => self.poll(&creds).await,
            Err(e) => {
                tracing::error!(
                    critical = true,
                    error = %e,
                    "credentials unavailable, skipping poll"
                );
                CycleOutcome::MissingCredentials
            }
        };
        self.cursor = self.clock.cursor();
        outcome
    }

    async fn poll(&self, creds: &Credentials) -> CycleOutcome {
        let notifier = Notifier::new(self.messenger.clone(), creds.chat_id);
        let from_date = clock::from_date(self.cursor, self.clock.as_ref());

        let payload = match self
            .api
            .homework_statuses(&creds.practicum_token, from_date)
            .await
        {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(from_date, error = %e, "homework API request failed");
                return CycleOutcome::NoData;
            }
        };

        match self.handle_payload(&payload, &notifier).await {
            Ok(outcome) => outcome,
            Err(e) => self.report_failure(&notifier, e).await,
        }
    }

    async fn handle_payload(
        &self,
        payload: &serde_json::Value,
        notifier: &Notifier,
    ) -> Result<CycleOutcome, Error> {
        let homeworks = homework::check_response(payload)?;
        let Some(latest) = homeworks.first() else {
            tracing::debug!("no new statuses in response");
            return Ok(CycleOutcome::NoUpdates);
        };

        let record = homework::parse_homework(latest)?;
        let delivered = notifier.notify(&record.message()).await;
        if delivered {
            tracing::info!(homework = %record.name, status = %record.status, "message sent");
        }
        Ok(CycleOutcome::Notified {
            status: record.status,
            delivered,
        })
    }

    async fn report_failure(&self, notifier: &Notifier, error: Error) -> CycleOutcome {
        tracing::error!(error = %error, "poll cycle failed");
        let text = homework::failure_message(&error);
        let alerted = match notifier.try_send(&text).await {
            Ok(()) => true,
            Err(send_err) => {
                // The user never sees the original failure, so keep both locally.
                tracing::error!(
                    original = %error,
                    send_error = %send_err,
                    "failure alert could not be delivered"
                );
                false
            }
        };
        CycleOutcome::Failed {
            error: error.to_string(),
            alerted,
        }
    }
}

#[async_trait]
impl RepeatingTask for Poller {
    async fn tick(&mut self) {
        let outcome = self.run_cycle().await;
        tracing::debug!(?outcome, cursor = self.cursor.0, "cycle finished");
    }
}
