use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::SubmitError;
use crate::http::SubmitResponse;

use super::answer::AnswerGenerators;
use super::clock::{PlaybackClock, video_info_line};
use super::frames::{Frame, FrameNavigator, frame_number_from_path};
use super::payload::{
    SubmissionRequest, ToleranceWindow, build_text_payload, build_time_range_payload,
};
use super::tracker::{Channel, SubmissionStatus, SubmissionTracker};

pub(crate) const TOLERANCE_STEP_MILLIS: i64 = 100;
pub(crate) const SCRUB_STEP_SECONDS: f64 = 1.0;

/// Caller-supplied inputs for one review session.
#[derive(Debug, Clone)]
pub(crate) struct ModalProps {
    pub(crate) frames: Vec<Frame>,
    pub(crate) initial_index: usize,
    pub(crate) video_name: String,
    pub(crate) timestamp: f64,
    pub(crate) frame_index: String,
    pub(crate) frame_number: String,
    pub(crate) fps: f64,
    pub(crate) fused_score: f64,
    pub(crate) duration_millis: Option<f64>,
    pub(crate) query_and_qna: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingSubmission {
    pub(crate) channel: Channel,
    pub(crate) request: SubmissionRequest,
}

#[derive(Debug, Clone)]
pub(crate) struct SubmissionResult {
    pub(crate) channel: Channel,
    pub(crate) outcome: Result<SubmitResponse, SubmitError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ModalCommand {
    None,
    Close,
    Submit(PendingSubmission),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GeneratedAnswers {
    pub(crate) scene: Option<String>,
    pub(crate) video: Option<String>,
    pub(crate) new_scene: Option<String>,
}

pub(crate) struct ReviewModal {
    frames: Vec<Frame>,
    navigator: FrameNavigator,
    clock: PlaybackClock,
    tolerance: ToleranceWindow,
    kis: SubmissionTracker,
    qna: SubmissionTracker,
    video_name: String,
    fallback_frame_number: String,
    fused_score: f64,
    query_and_qna: bool,
    answer_draft: Option<String>,
    generators: AnswerGenerators,
    answers: GeneratedAnswers,
    status: String,
}

impl ReviewModal {
    pub(crate) fn open(props: ModalProps) -> Result<Self> {
        Self::open_with_generators(props, AnswerGenerators::default())
    }

    pub(crate) fn open_with_generators(
        props: ModalProps,
        generators: AnswerGenerators,
    ) -> Result<Self> {
        let navigator = FrameNavigator::new(props.frames.len(), props.initial_index)?;
        let mut clock = PlaybackClock::new(props.timestamp, &props.frame_index, props.fps)?;
        clock.set_duration_millis(props.duration_millis);

        Ok(Self {
            frames: props.frames,
            navigator,
            clock,
            tolerance: ToleranceWindow::default(),
            kis: SubmissionTracker::default(),
            qna: SubmissionTracker::default(),
            video_name: props.video_name,
            fallback_frame_number: props.frame_number,
            fused_score: props.fused_score,
            query_and_qna: props.query_and_qna,
            answer_draft: None,
            generators,
            answers: GeneratedAnswers::default(),
            status: status_info("Ready."),
        })
    }

    pub(crate) fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub(crate) fn frame_count(&self) -> usize {
        self.navigator.len()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.navigator.cursor()
    }

    pub(crate) fn current_frame(&self) -> &Frame {
        &self.frames[self.navigator.cursor()]
    }

    pub(crate) fn current_frame_number(&self) -> &str {
        frame_number_from_path(&self.current_frame().path).unwrap_or(self.fallback_frame_number.as_str())
    }

    pub(crate) fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub(crate) fn tolerance(&self) -> ToleranceWindow {
        self.tolerance
    }

    pub(crate) fn tracker(&self, channel: Channel) -> &SubmissionTracker {
        match channel {
            Channel::Kis => &self.kis,
            Channel::Qna => &self.qna,
        }
    }

    fn tracker_mut(&mut self, channel: Channel) -> &mut SubmissionTracker {
        match channel {
            Channel::Kis => &mut self.kis,
            Channel::Qna => &mut self.qna,
        }
    }

    pub(crate) fn status_of(&self, channel: Channel) -> SubmissionStatus {
        self.tracker(channel).status()
    }

    pub(crate) fn video_name(&self) -> &str {
        &self.video_name
    }

    pub(crate) fn fused_score(&self) -> f64 {
        self.fused_score
    }

    pub(crate) fn is_query_and_qna(&self) -> bool {
        self.query_and_qna
    }

    pub(crate) fn answer_draft(&self) -> Option<&str> {
        self.answer_draft.as_deref()
    }

    pub(crate) fn answers(&self) -> &GeneratedAnswers {
        &self.answers
    }

    pub(crate) fn status(&self) -> &str {
        &self.status
    }

    pub(crate) fn next_frame(&mut self) {
        self.navigator.next();
    }

    pub(crate) fn previous_frame(&mut self) {
        self.navigator.previous();
    }

    /// Player time-update.
    pub(crate) fn handle_time_update(&mut self, time_seconds: f64) {
        self.clock.set_time(time_seconds);
    }

    /// A seek relative to the current time, bounded the way a player is.
    pub(crate) fn scrub_by(&mut self, delta_seconds: f64) {
        let mut target = (self.clock.time_seconds() + delta_seconds).max(0.0);
        if let Some(duration_millis) = self.clock.duration_millis() {
            target = target.min(duration_millis / 1000.0);
        }
        self.handle_time_update(target);
    }

    pub(crate) fn adjust_tolerance(&mut self, delta_millis: i64) {
        match self.tolerance.adjust(delta_millis) {
            Ok(()) => {
                self.status = status_info(&format!(
                    "Tolerance window: {} ms",
                    self.tolerance.range_millis()
                ))
            }
            Err(err) => self.status = status_error(&err.to_string()),
        }
    }

    pub(crate) fn video_info(&self) -> String {
        video_info_line(
            &self.video_name,
            self.current_frame_number(),
            self.clock.time_seconds(),
            self.clock.fps(),
        )
    }

    pub(crate) fn submit_kis(&mut self) -> Option<PendingSubmission> {
        if self.kis.is_submitting() {
            self.status = status_info("KIS submission already in flight.");
            return None;
        }
        let built = build_time_range_payload(
            self.clock.time_seconds(),
            self.tolerance,
            &self.video_name,
            self.clock.duration_millis(),
        );
        match built {
            Ok(request) => self.dispatch(Channel::Kis, request),
            Err(err) => {
                tracing::error!(channel = Channel::Kis.label(), error = %err, "submission rejected");
                self.kis.fail_before_dispatch(&err);
                self.status = status_error(&format!("KIS submission failed: {err}"));
                None
            }
        }
    }

    pub(crate) fn submit_qna(&mut self, answer: &str) -> Option<PendingSubmission> {
        if self.qna.is_submitting() {
            self.status = status_info("QnA submission already in flight.");
            return None;
        }
        if answer.trim().is_empty() {
            self.status = status_error("QnA answer is empty.");
            return None;
        }
        let request = build_text_payload(answer, self.clock.time_seconds(), &self.video_name);
        self.dispatch(Channel::Qna, request)
    }

    fn dispatch(&mut self, channel: Channel, request: SubmissionRequest) -> Option<PendingSubmission> {
        if !self.tracker_mut(channel).begin() {
            return None;
        }
        tracing::info!(
            channel = channel.label(),
            request = %request.summary(),
            "submission dispatched"
        );
        self.status = status_info(&format!(
            "Submitting {} answer {}...",
            channel.label(),
            request.summary()
        ));
        Some(PendingSubmission { channel, request })
    }

    pub(crate) fn apply_result(&mut self, result: SubmissionResult) {
        let channel = result.channel;
        self.tracker_mut(channel).complete(&result.outcome);
        match &result.outcome {
            Ok(response) => {
                let verdict = response.verdict_text();
                tracing::info!(
                    channel = channel.label(),
                    status = response.status,
                    verdict = verdict.as_deref().unwrap_or("-"),
                    "submission accepted"
                );
                let detail = verdict
                    .map(|text| format!(" ({text})"))
                    .unwrap_or_default();
                self.status = status_info(&format!(
                    "{} submission accepted{detail}",
                    channel.label()
                ));
            }
            Err(err) => {
                tracing::error!(channel = channel.label(), error = %err, "submission failed");
                self.status = status_error(&format!("{} submission failed: {err}", channel.label()));
            }
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> ModalCommand {
        if key.code == KeyCode::Esc {
            return ModalCommand::Close;
        }

        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let command_held = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META);
        if shift && !command_held {
            match key.code {
                KeyCode::Right => {
                    self.next_frame();
                    return ModalCommand::None;
                }
                KeyCode::Left => {
                    self.previous_frame();
                    return ModalCommand::None;
                }
                _ => {}
            }
        }

        if self.answer_draft.is_some() {
            return self.handle_draft_key(key, command_held);
        }
        if command_held {
            return ModalCommand::None;
        }

        match key.code {
            KeyCode::Right => self.scrub_by(SCRUB_STEP_SECONDS),
            KeyCode::Left => self.scrub_by(-SCRUB_STEP_SECONDS),
            KeyCode::Char('.') => self.scrub_by(1.0 / self.clock.fps()),
            KeyCode::Char(',') => self.scrub_by(-1.0 / self.clock.fps()),
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_tolerance(TOLERANCE_STEP_MILLIS),
            KeyCode::Char('-') => self.adjust_tolerance(-TOLERANCE_STEP_MILLIS),
            KeyCode::Enter => {
                if let Some(pending) = self.submit_kis() {
                    return ModalCommand::Submit(pending);
                }
            }
            KeyCode::Char('a') => {
                self.answer_draft = Some(String::new());
                self.status = status_info("Type the QnA answer, Enter to submit.");
            }
            KeyCode::Char('i') => {
                let info = self.video_info();
                tracing::info!(%info, "video info");
                self.status = status_info(&info);
            }
            KeyCode::Char('s') if self.query_and_qna => {
                self.answers.scene = Some(self.generators.scene.generate());
            }
            KeyCode::Char('v') if self.query_and_qna => {
                self.answers.video = Some(self.generators.video.generate());
            }
            KeyCode::Char('n') if self.query_and_qna => {
                self.answers.new_scene = Some(self.generators.new_scene.generate());
            }
            _ => {}
        }
        ModalCommand::None
    }

    fn handle_draft_key(&mut self, key: KeyEvent, command_held: bool) -> ModalCommand {
        let Some(draft) = self.answer_draft.as_mut() else {
            return ModalCommand::None;
        };
        match key.code {
            KeyCode::Char(ch) if !command_held => draft.push(ch),
            KeyCode::Backspace => {
                draft.pop();
            }
            KeyCode::Enter => {
                let answer = draft.clone();
                let Some(pending) = self.submit_qna(&answer) else {
                    return ModalCommand::None;
                };
                self.answer_draft = None;
                return ModalCommand::Submit(pending);
            }
            _ => {}
        }
        ModalCommand::None
    }
}

pub(crate) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(crate) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}
