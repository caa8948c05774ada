mod answer;
mod clock;
mod frames;
mod modal;
pub(crate) mod payload;
pub(crate) mod tracker;
mod tui;


use anyhow::{Context, Result, bail};

use crate::cli::{Cli, Command, ReviewArgs, SubmitKisArgs, SubmitQnaArgs};
use crate::config::JudgeConfig;
use crate::http::EvaluationClient;
use crate::logging;
use crate::paths::log_file_path;

use self::frames::read_frame_list;
use self::modal::{ModalProps, ReviewModal};
use self::payload::{
    SubmissionRequest, ToleranceWindow, build_text_payload, build_time_range_payload,
};
use self::tracker::{Channel, SubmissionTracker};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Review(args) => run_review(args),
        Command::SubmitKis(args) => run_submit_kis(args),
        Command::SubmitQna(args) => run_submit_qna(args),
    }
}

fn run_review(args: ReviewArgs) -> Result<()> {
    let log_path = match args.log_file.clone() {
        Some(path) => path,
        None => log_file_path()?,
    };
    logging::init_file(&log_path)?;

    let config = JudgeConfig::from_args(&args.judge)?;
    tracing::info!(judge = %config.base_url, "judge configured");
    let client = EvaluationClient::new(config);

    let read = read_frame_list(&args.frames)?;
    if read.skipped > 0 {
        tracing::warn!(
            skipped = read.skipped,
            file = %args.frames.display(),
            "frame entries without a path were skipped"
        );
    }
    tracing::info!(frames = read.frames.len(), video = %args.video, "opening review");

    let modal = ReviewModal::open(ModalProps {
        frames: read.frames,
        initial_index: args.index,
        video_name: args.video,
        timestamp: args.timestamp,
        frame_index: args.frame_index.unwrap_or_default(),
        frame_number: args.frame_number,
        fps: args.fps,
        fused_score: args.score,
        duration_millis: args.duration_ms,
        query_and_qna: args.qna,
    })
    .context("failed to open review")?;

    tui::run_review(modal, &client)?;
    println!("Review closed. Log: {}", log_path.display());
    Ok(())
}

fn run_submit_kis(args: SubmitKisArgs) -> Result<()> {
    logging::init_stderr()?;
    let config = JudgeConfig::from_args(&args.judge)?;
    let tolerance = ToleranceWindow::new(args.range)?;
    let request = build_time_range_payload(args.time, tolerance, &args.video, args.duration_ms)?;
    submit_once(config, Channel::Kis, request)
}

fn run_submit_qna(args: SubmitQnaArgs) -> Result<()> {
    logging::init_stderr()?;
    let config = JudgeConfig::from_args(&args.judge)?;
    if args.answer.trim().is_empty() {
        bail!("answer must not be empty");
    }
    let request = build_text_payload(&args.answer, args.time, &args.video);
    submit_once(config, Channel::Qna, request)
}

fn submit_once(config: JudgeConfig, channel: Channel, request: SubmissionRequest) -> Result<()> {
    let client = EvaluationClient::new(config);
    let mut tracker = SubmissionTracker::default();
    tracker.begin();
    println!("Submitting {} answer {}", channel.label(), request.summary());

    let outcome = client.submit(channel, &request);
    tracker.complete(&outcome);
    match outcome {
        Ok(response) => {
            tracing::info!(channel = channel.label(), status = response.status, "submission accepted");
            println!("{}: HTTP {}", tracker.status().label(), response.status);
            if let Some(verdict) = tracker.last_verdict() {
                println!("  {verdict}");
            }
            Ok(())
        }
        Err(err) => {
            tracing::error!(channel = channel.label(), error = %err, "submission failed");
            Err(err).with_context(|| format!("{} submission failed", channel.label()))
        }
    }
}
