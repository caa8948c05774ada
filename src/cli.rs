use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "framereview",
    version,
    about = "Review retrieved video frames and submit answers to the evaluation server"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the review view over a candidate frame list.
    Review(ReviewArgs),
    /// Submit a single time-range answer without opening the review view.
    SubmitKis(SubmitKisArgs),
    /// Submit a single text answer without opening the review view.
    SubmitQna(SubmitQnaArgs),
}

#[derive(Debug, Args)]
pub struct JudgeArgs {
    #[arg(
        long = "judge-url",
        env = "FRAMEREVIEW_JUDGE_URL",
        default_value = "https://eventretrieval.one"
    )]
    pub base_url: String,

    #[arg(long = "session", env = "FRAMEREVIEW_SESSION_ID", hide_env_values = true)]
    pub session_id: String,

    #[arg(long = "evaluation-kis", env = "FRAMEREVIEW_EVALUATION_KIS")]
    pub evaluation_id_kis: String,

    #[arg(long = "evaluation-qna", env = "FRAMEREVIEW_EVALUATION_QNA")]
    pub evaluation_id_qna: String,
}

#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// JSON file holding the candidate frames (array of objects with a `path`).
    #[arg(long)]
    pub frames: PathBuf,

    #[arg(long, default_value_t = 0)]
    pub index: usize,

    /// Media item name, as known to the evaluation server.
    #[arg(long)]
    pub video: String,

    #[arg(long, default_value_t = 0.0, value_parser = parse_seconds)]
    pub timestamp: f64,

    /// Derived from the timestamp and fps when omitted.
    #[arg(long = "frame-index")]
    pub frame_index: Option<String>,

    /// Shown when a frame path does not encode a frame number.
    #[arg(long = "frame-number", default_value = "-")]
    pub frame_number: String,

    #[arg(long)]
    pub fps: f64,

    #[arg(long, default_value_t = 0.0)]
    pub score: f64,

    /// Video duration in milliseconds; time-range answers need it.
    #[arg(long = "duration-ms")]
    pub duration_ms: Option<f64>,

    /// Use the query and QnA layout.
    #[arg(long)]
    pub qna: bool,

    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub judge: JudgeArgs,
}

#[derive(Debug, Args)]
pub struct SubmitKisArgs {
    #[arg(long)]
    pub video: String,

    /// Timestamp in seconds.
    #[arg(long, value_parser = parse_seconds)]
    pub time: f64,

    /// Tolerance window in milliseconds on each side of the timestamp.
    #[arg(long, default_value_t = 1000, allow_negative_numbers = true)]
    pub range: i64,

    #[arg(long = "duration-ms")]
    pub duration_ms: Option<f64>,

    #[command(flatten)]
    pub judge: JudgeArgs,
}

#[derive(Debug, Args)]
pub struct SubmitQnaArgs {
    #[arg(long)]
    pub answer: String,

    #[arg(long)]
    pub video: String,

    #[arg(long, value_parser = parse_seconds)]
    pub time: f64,

    #[command(flatten)]
    pub judge: JudgeArgs,
}

/// Playback positions are finite and never negative.
fn parse_seconds(raw: &str) -> Result<f64, String> {
    let seconds: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("`{raw}` must be a finite, non-negative number of seconds"));
    }
    Ok(seconds)
}
