use serde_json::{Value, json};

use crate::error::{SubmitError, ToleranceError};

pub(crate) const DEFAULT_TOLERANCE_MILLIS: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ToleranceWindow {
    range_millis: i64,
}

impl Default for ToleranceWindow {
    fn default() -> Self {
        Self {
            range_millis: DEFAULT_TOLERANCE_MILLIS,
        }
    }
}

impl ToleranceWindow {
    pub(crate) fn new(range_millis: i64) -> Result<Self, ToleranceError> {
        let mut window = Self::default();
        window.set(range_millis)?;
        Ok(window)
    }

    pub(crate) fn range_millis(&self) -> i64 {
        self.range_millis
    }

    pub(crate) fn set(&mut self, range_millis: i64) -> Result<(), ToleranceError> {
        if range_millis < 0 {
            return Err(ToleranceError::Negative(range_millis));
        }
        self.range_millis = range_millis;
        Ok(())
    }

    pub(crate) fn adjust(&mut self, delta_millis: i64) -> Result<(), ToleranceError> {
        self.set(self.range_millis.saturating_add(delta_millis))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SubmissionRequest {
    TimeRange {
        media_item_name: String,
        start_millis: i64,
        end_millis: i64,
    },
    Text {
        text: String,
    },
}

impl SubmissionRequest {
    pub(crate) fn to_body(&self) -> Value {
        let answer = match self {
            Self::TimeRange {
                media_item_name,
                start_millis,
                end_millis,
            } => json!({
                "mediaItemName": media_item_name,
                "start": start_millis,
                "end": end_millis,
            }),
            Self::Text { text } => json!({ "text": text }),
        };
        json!({ "answerSets": [{ "answers": [answer] }] })
    }

    pub(crate) fn summary(&self) -> String {
        match self {
            Self::TimeRange {
                media_item_name,
                start_millis,
                end_millis,
            } => format!("{media_item_name} [{start_millis}..{end_millis}] ms"),
            Self::Text { text } => format!("\"{text}\""),
        }
    }
}

/// Unknown duration is rejected instead of sending an unbounded end time.
pub(crate) fn build_time_range_payload(
    time_seconds: f64,
    tolerance: ToleranceWindow,
    media_item_name: &str,
    video_duration_millis: Option<f64>,
) -> Result<SubmissionRequest, SubmitError> {
    let Some(duration_millis) = video_duration_millis.filter(|ms| ms.is_finite()) else {
        return Err(SubmitError::ClockNotReady);
    };
    let now_millis = time_seconds * 1000.0;
    let range = tolerance.range_millis() as f64;
    let start = (now_millis - range).max(0.0).floor();
    let end = (now_millis + range).min(duration_millis).floor();

    Ok(SubmissionRequest::TimeRange {
        media_item_name: media_item_name.to_string(),
        start_millis: start as i64,
        end_millis: end as i64,
    })
}

pub(crate) fn build_text_payload(
    answer: &str,
    time_seconds: f64,
    media_item_name: &str,
) -> SubmissionRequest {
    let millis = (time_seconds * 1000.0).floor() as i64;
    SubmissionRequest::Text {
        text: format!("{answer}-{media_item_name}-{millis}"),
    }
}
