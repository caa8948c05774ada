mod actions;
mod render;
mod session;

use std::io;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::http::EvaluationClient;

use super::modal::{ModalCommand, ReviewModal, SubmissionResult};

use self::actions::{InFlight, drain_submission_results};
use self::render::draw_review;
use self::session::TerminalGuard;

pub(crate) fn run_review(mut modal: ReviewModal, client: &EvaluationClient) -> Result<()> {
    let mut guard = TerminalGuard::acquire()?;
    let (result_tx, result_rx) = mpsc::channel::<SubmissionResult>();
    let mut in_flight = InFlight::default();

    let outcome = event_loop(&mut modal, client, &result_tx, &result_rx, &mut in_flight);

    // Issued submissions finish even when the loop bailed out with an error.
    let restored = guard.restore();
    drop(result_rx);
    in_flight.wait_all();
    outcome.and(restored)
}

fn event_loop(
    modal: &mut ReviewModal,
    client: &EvaluationClient,
    result_tx: &mpsc::Sender<SubmissionResult>,
    result_rx: &mpsc::Receiver<SubmissionResult>,
    in_flight: &mut InFlight,
) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    loop {
        drain_submission_results(result_rx, modal);
        terminal.draw(|frame| draw_review(frame, modal))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Some(key) = key_press(event::read()?) else {
            continue;
        };

        match modal.handle_key(key) {
            ModalCommand::Close => return Ok(()),
            ModalCommand::Submit(pending) => {
                // Status already reads SUBMITTING; show it before the request goes out.
                terminal.draw(|frame| draw_review(frame, modal))?;
                in_flight.dispatch(client, pending, result_tx);
            }
            ModalCommand::None => {}
        }
    }
}

/// Only presses reach the modal; release and repeat events would double keys.
fn key_press(event: Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}
