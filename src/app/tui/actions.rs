use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use crate::http::EvaluationClient;

use super::super::modal::{PendingSubmission, ReviewModal, SubmissionResult};

/// Submissions that were issued and may still be running.
#[derive(Default)]
pub(super) struct InFlight {
    handles: Vec<JoinHandle<()>>,
}

impl InFlight {
    pub(super) fn dispatch(
        &mut self,
        client: &EvaluationClient,
        pending: PendingSubmission,
        tx: &mpsc::Sender<SubmissionResult>,
    ) {
        self.handles.retain(|handle| !handle.is_finished());
        let client = client.clone();
        let tx = tx.clone();
        self.handles.push(thread::spawn(move || {
            let PendingSubmission { channel, request } = pending;
            let outcome = client.submit(channel, &request);
            if let Err(mpsc::SendError(unclaimed)) = tx.send(SubmissionResult { channel, outcome }) {
                match unclaimed.outcome {
                    Ok(response) => tracing::info!(
                        channel = channel.label(),
                        status = response.status,
                        "submission accepted after review closed"
                    ),
                    Err(err) => tracing::error!(
                        channel = channel.label(),
                        error = %err,
                        "submission failed after review closed"
                    ),
                }
            }
        }));
    }

    /// Requests are never cancelled; closing waits for them to finish.
    pub(super) fn wait_all(&mut self) {
        let handles = std::mem::take(&mut self.handles);
        let outstanding = handles.iter().filter(|handle| !handle.is_finished()).count();
        if outstanding > 0 {
            tracing::info!(outstanding, "waiting for in-flight submissions");
        }
        for handle in handles {
            if handle.join().is_err() {
                tracing::error!("submission thread panicked");
            }
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.wait_all();
    }
}

pub(super) fn drain_submission_results(
    rx: &mpsc::Receiver<SubmissionResult>,
    modal: &mut ReviewModal,
) {
    while let Ok(result) = rx.try_recv() {
        modal.apply_result(result);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use crate::http::test_server::{Behavior, TestServer, request_body};

    use super::super::super::frames::Frame;
    use super::super::super::modal::{ModalProps, ReviewModal, SubmissionResult};
    use super::super::super::tracker::{Channel, SubmissionStatus};
    use super::{InFlight, drain_submission_results};

    fn modal() -> ReviewModal {
        ReviewModal::open(ModalProps {
            frames: vec![Frame {
                path: "keyframes/L01_V001/frame_0012_001.jpg".to_string(),
            }],
            initial_index: 0,
            video_name: "L01_V001".to_string(),
            timestamp: 10.0,
            frame_index: "250".to_string(),
            frame_number: "-".to_string(),
            fps: 25.0,
            fused_score: 0.5,
            duration_millis: Some(20_000.0),
            query_and_qna: false,
        })
        .expect("modal opens")
    }

    #[test]
    fn dispatched_result_is_drained_into_the_tracker() {
        let server = TestServer::spawn(vec![Behavior::Respond(
            200,
            r#"{"submission":"CORRECT","description":"ok"}"#.to_string(),
        )]);
        let client = server.client();
        let mut modal = modal();
        let (tx, rx) = mpsc::channel::<SubmissionResult>();
        let mut in_flight = InFlight::default();

        let pending = modal.submit_kis().expect("duration is known");
        assert_eq!(modal.status_of(Channel::Kis), SubmissionStatus::Submitting);
        in_flight.dispatch(&client, pending, &tx);
        in_flight.wait_all();

        drain_submission_results(&rx, &mut modal);
        assert_eq!(modal.status_of(Channel::Kis), SubmissionStatus::Success);
        assert_eq!(modal.tracker(Channel::Kis).last_verdict(), Some("CORRECT: ok"));
        assert_eq!(modal.status(), "INFO: KIS submission accepted (CORRECT: ok)");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            request_body(&requests[0]),
            serde_json::json!({
                "answerSets": [{
                    "answers": [{"mediaItemName": "L01_V001", "start": 9000, "end": 11000}]
                }]
            })
        );
    }

    #[test]
    fn closed_review_still_waits_for_the_request() {
        let server = TestServer::spawn(vec![Behavior::DelayRespond(
            Duration::from_millis(300),
            500,
            "boom".to_string(),
        )]);
        let client = server.client();
        let mut modal = modal();
        let (tx, rx) = mpsc::channel::<SubmissionResult>();
        let mut in_flight = InFlight::default();

        let pending = modal.submit_qna("yes").expect("answer submits");
        in_flight.dispatch(&client, pending, &tx);
        drop(rx);
        in_flight.wait_all();

        assert_eq!(server.requests().len(), 1);
        assert!(in_flight.handles.is_empty());
        assert_eq!(modal.status_of(Channel::Qna), SubmissionStatus::Submitting);
    }

    #[test]
    fn dropping_in_flight_joins_outstanding_submissions() {
        let server = TestServer::spawn(vec![Behavior::DelayRespond(
            Duration::from_millis(300),
            200,
            "{}".to_string(),
        )]);
        let client = server.client();
        let mut modal = modal();
        let (tx, rx) = mpsc::channel::<SubmissionResult>();

        {
            let mut in_flight = InFlight::default();
            let pending = modal.submit_kis().expect("duration is known");
            in_flight.dispatch(&client, pending, &tx);
        }

        let result = rx.try_recv().expect("request finished before the drop returned");
        assert_eq!(result.channel, Channel::Kis);
        assert_eq!(result.outcome.map(|response| response.status), Ok(200));
        assert_eq!(server.requests().len(), 1);
    }
}
