use anyhow::{Result, bail};

use crate::cli::JudgeArgs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeConfig {
    pub base_url: String,
    pub session_id: String,
    pub evaluation_id_kis: String,
    pub evaluation_id_qna: String,
}

impl JudgeConfig {
    pub fn new(
        base_url: &str,
        session_id: &str,
        evaluation_id_kis: &str,
        evaluation_id_qna: &str,
    ) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!("judge url must start with http:// or https://, got `{base_url}`");
        }

        let session_id = require_non_empty("session id", session_id)?;
        let evaluation_id_kis = require_non_empty("KIS evaluation id", evaluation_id_kis)?;
        let evaluation_id_qna = require_non_empty("QnA evaluation id", evaluation_id_qna)?;

        Ok(Self {
            base_url: base_url.to_string(),
            session_id,
            evaluation_id_kis,
            evaluation_id_qna,
        })
    }

    pub fn from_args(args: &JudgeArgs) -> Result<Self> {
        Self::new(
            &args.base_url,
            &args.session_id,
            &args.evaluation_id_kis,
            &args.evaluation_id_qna,
        )
    }
}

fn require_non_empty(label: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("{label} must not be empty");
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_and_whitespace() {
        let config = JudgeConfig::new(" https://judge.test/ ", " sid ", "kis", "qna")
            .expect("config should validate");
        assert_eq!(config.base_url, "https://judge.test");
        assert_eq!(config.session_id, "sid");
    }

    #[test]
    fn rejects_blank_identifiers() {
        let err = JudgeConfig::new("https://judge.test", "sid", "  ", "qna")
            .expect_err("blank KIS id should be rejected");
        assert!(err.to_string().contains("KIS evaluation id"));
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(JudgeConfig::new("judge.test", "sid", "kis", "qna").is_err());
    }
}
