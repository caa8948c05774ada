use serde_json::Value;

use crate::app::payload::SubmissionRequest;
use crate::app::tracker::Channel;
use crate::config::JudgeConfig;
use crate::error::SubmitError;

const ERROR_BODY_LIMIT: usize = 240;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SubmitResponse {
    pub(crate) status: u16,
    pub(crate) body: Value,
}

impl SubmitResponse {
    pub(crate) fn description(&self) -> Option<&str> {
        self.body.get("description").and_then(Value::as_str)
    }

    pub(crate) fn verdict(&self) -> Option<&str> {
        self.body.get("submission").and_then(Value::as_str)
    }

    pub(crate) fn verdict_text(&self) -> Option<String> {
        match (self.verdict(), self.description()) {
            (Some(verdict), Some(description)) => Some(format!("{verdict}: {description}")),
            (Some(verdict), None) => Some(verdict.to_string()),
            (None, Some(description)) => Some(description.to_string()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EvaluationClient {
    config: JudgeConfig,
    agent: ureq::Agent,
}

impl EvaluationClient {
    pub(crate) fn new(config: JudgeConfig) -> Self {
        Self {
            config,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub(crate) fn evaluation_id(&self, channel: Channel) -> &str {
        match channel {
            Channel::Kis => &self.config.evaluation_id_kis,
            Channel::Qna => &self.config.evaluation_id_qna,
        }
    }

    pub(crate) fn submit_url(&self, channel: Channel) -> String {
        format!(
            "{}/api/v2/submit/{}",
            self.config.base_url,
            self.evaluation_id(channel)
        )
    }

    /// Exactly one attempt; the caller decides what to do with a failure.
    pub(crate) fn submit(
        &self,
        channel: Channel,
        request: &SubmissionRequest,
    ) -> Result<SubmitResponse, SubmitError> {
        let url = self.submit_url(channel);
        let session_id = &self.config.session_id;
        let body = request.to_body().to_string();
        tracing::debug!(channel = channel.label(), %url, %body, "sending submission");

        let result = self
            .agent
            .post(&url)
            .query("session", session_id)
            .set("Content-Type", "application/json")
            .set("Authorization", &format!("Bearer {session_id}"))
            .send_string(&body);

        match result {
            Ok(response) => {
                let status = response.status();
                let raw = match response.into_string() {
                    Ok(raw) => raw,
                    Err(err) => {
                        tracing::warn!(status, error = %err, "judge response body unreadable");
                        String::new()
                    }
                };
                if !(200..=299).contains(&status) {
                    return Err(SubmitError::Http {
                        status,
                        body: truncate_body(&raw),
                    });
                }
                Ok(SubmitResponse {
                    status,
                    body: serde_json::from_str(raw.trim()).unwrap_or(Value::Null),
                })
            }
            Err(ureq::Error::Status(status, response)) => {
                let raw = response.into_string().ok().unwrap_or_default();
                Err(SubmitError::Http {
                    status,
                    body: truncate_body(&raw),
                })
            }
            Err(ureq::Error::Transport(err)) => Err(SubmitError::Transport(err.to_string())),
        }
    }
}

fn truncate_body(raw: &str) -> String {
    raw.trim().chars().take(ERROR_BODY_LIMIT).collect()
}

#[cfg(test)]
pub(crate) mod test_server;
