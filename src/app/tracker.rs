use chrono::{DateTime, Local};

use crate::error::SubmitError;
use crate::http::SubmitResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Channel {
    /// Time-range answers.
    Kis,
    /// Text answers.
    Qna,
}

impl Channel {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Kis => "KIS",
            Self::Qna => "QnA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SubmissionStatus {
    #[default]
    Unset,
    Submitting,
    Success,
    Error,
}

impl SubmissionStatus {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Unset => "NOT SENT",
            Self::Submitting => "SUBMITTING",
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SubmissionTracker {
    status: SubmissionStatus,
    attempts: u32,
    last_error: Option<String>,
    last_verdict: Option<String>,
    completed_at: Option<DateTime<Local>>,
}

impl SubmissionTracker {
    pub(crate) fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempts
    }

    pub(crate) fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn last_verdict(&self) -> Option<&str> {
        self.last_verdict.as_deref()
    }

    pub(crate) fn completed_at_display(&self) -> Option<String> {
        self.completed_at.map(|at| at.format("%H:%M:%S").to_string())
    }

    pub(crate) fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    /// Returns false, leaving the state untouched, while an attempt is in flight.
    pub(crate) fn begin(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.status = SubmissionStatus::Submitting;
        self.attempts += 1;
        self.last_error = None;
        self.last_verdict = None;
        self.completed_at = None;
        true
    }

    pub(crate) fn complete(&mut self, result: &Result<SubmitResponse, SubmitError>) {
        if !self.is_submitting() {
            return;
        }
        self.completed_at = Some(Local::now());
        match result {
            Ok(response) => {
                self.status = SubmissionStatus::Success;
                self.last_verdict = response.verdict_text();
            }
            Err(err) => {
                self.status = SubmissionStatus::Error;
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// An attempt that failed before any request was issued.
    pub(crate) fn fail_before_dispatch(&mut self, err: &SubmitError) -> bool {
        if !self.begin() {
            return false;
        }
        self.complete(&Err(err.clone()));
        true
    }
}
