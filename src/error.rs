#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// No response was obtained (DNS, connect, TLS, broken stream).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP status {status}{}", format_body(.body))]
    Http { status: u16, body: String },

    /// The video duration is unknown, so the time range cannot be clamped.
    #[error("video duration unavailable; time range cannot be built")]
    ClockNotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ToleranceError {
    #[error("tolerance window must not be negative (got {0} ms)")]
    Negative(i64),
}

fn format_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" ({body})")
    }
}
