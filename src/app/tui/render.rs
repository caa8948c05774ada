use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use super::super::clock::format_time;
use super::super::frames::frame_number_from_path;
use super::super::modal::ReviewModal;
use super::super::tracker::{Channel, SubmissionStatus};

const ACCENT: Color = Color::Rgb(110, 170, 255);
const MUTED: Color = Color::Rgb(185, 195, 210);
const TEXT: Color = Color::Rgb(230, 235, 242);

pub(super) fn draw_review(frame: &mut Frame, modal: &ReviewModal) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    frame.render_widget(header(modal), chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[1]);
    draw_frame_list(frame, modal, body_chunks[0]);
    draw_details(frame, modal, body_chunks[1]);

    frame.render_widget(submission_panel(modal), chunks[2]);

    let controls = Paragraph::new(controls_line(modal))
        .alignment(Alignment::Center)
        .block(panel_block("Controls"));
    frame.render_widget(controls, chunks[3]);

    let status = Paragraph::new(modal.status().to_string())
        .style(status_style(modal.status()))
        .block(panel_block("Status"));
    frame.render_widget(status, chunks[4]);
}

fn header(modal: &ReviewModal) -> Paragraph<'static> {
    let clock = modal.clock();
    let spacer = || Span::styled("   ", Style::default());
    let muted = |text: String| Span::styled(text, Style::default().fg(MUTED));
    let mode = if modal.is_query_and_qna() {
        "QUERY + QNA"
    } else {
        "VIDEO REVIEW"
    };

    Paragraph::new(Line::from(vec![
        Span::styled(
            modal.video_name().to_string(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        spacer(),
        muted(format!("frame {}", modal.current_frame_number())),
        spacer(),
        muted(format!("index {}", clock.frame_index())),
        spacer(),
        muted(format!("time {}", format_time(clock.time_seconds()))),
        spacer(),
        muted(format!("score {:.4}", modal.fused_score())),
        spacer(),
        muted(format!("{}/{}", modal.cursor() + 1, modal.frame_count())),
        spacer(),
        Span::styled(mode, Style::default().fg(Color::Yellow)),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Review"))
}

fn draw_frame_list(frame: &mut Frame, modal: &ReviewModal, area: Rect) {
    let rows: Vec<Row> = modal
        .frames()
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            Row::new(vec![
                Cell::from((idx + 1).to_string()),
                Cell::from(frame_number_from_path(&item.path).unwrap_or("-").to_string()),
                Cell::from(item.path.clone()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["#", "Frame", "Path"])
            .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
    )
    .block(panel_block("Candidates"))
    .row_highlight_style(
        Style::default()
            .bg(ACCENT)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▸ ");

    let mut state = TableState::default();
    state.select(Some(modal.cursor()));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_details(frame: &mut Frame, modal: &ReviewModal, area: Rect) {
    let clock = modal.clock();
    let duration = clock
        .duration_millis()
        .map(|ms| format_time(ms / 1000.0))
        .unwrap_or_else(|| "unknown".to_string());
    let mut text = format!(
        "Frame path\n{}\n\nPlayback\n{:.3} s ({}) of {}\nframe index {} @ {} fps",
        modal.current_frame().path,
        clock.time_seconds(),
        format_time(clock.time_seconds()),
        duration,
        clock.frame_index(),
        clock.fps(),
    );

    if modal.is_query_and_qna() {
        let answers = modal.answers();
        let shown = |answer: &Option<String>| answer.clone().unwrap_or_else(|| "-".to_string());
        text.push_str(&format!(
            "\n\nScene answer\n{}\n\nVideo answer\n{}\n\nNew scene answer\n{}",
            shown(&answers.scene),
            shown(&answers.video),
            shown(&answers.new_scene),
        ));
    }

    let details = Paragraph::new(text)
        .style(Style::default().fg(TEXT))
        .wrap(Wrap { trim: false })
        .block(panel_block("Selected"));
    frame.render_widget(details, area);
}

fn submission_panel(modal: &ReviewModal) -> Paragraph<'static> {
    let mut lines = vec![Line::from(vec![
        Span::styled("Tolerance ", Style::default().fg(MUTED)),
        Span::styled(
            format!("±{} ms", modal.tolerance().range_millis()),
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        ),
    ])];

    for channel in [Channel::Kis, Channel::Qna] {
        lines.push(channel_line(modal, channel));
    }

    let draft = match modal.answer_draft() {
        Some(draft) => Line::from(vec![
            Span::styled("Answer ", Style::default().fg(MUTED)),
            Span::styled(
                format!("{draft}_"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(Span::styled(
            "Press a to type a QnA answer",
            Style::default().fg(MUTED),
        )),
    };
    lines.push(draft);

    Paragraph::new(lines).block(panel_block("Submission"))
}

fn channel_line(modal: &ReviewModal, channel: Channel) -> Line<'static> {
    let tracker = modal.tracker(channel);
    let mut spans = vec![
        Span::styled(format!("{:<4}", channel.label()), Style::default().fg(MUTED)),
        Span::styled(
            format!(" {} ", modal.status_of(channel).label()),
            status_pill(modal.status_of(channel)),
        ),
    ];
    if tracker.attempts() > 0 {
        spans.push(Span::styled(
            format!(" #{}", tracker.attempts()),
            Style::default().fg(MUTED),
        ));
    }
    let detail = tracker.last_error().or(tracker.last_verdict());
    if let Some(detail) = detail {
        spans.push(Span::styled(
            format!("  {detail}"),
            Style::default().fg(MUTED),
        ));
    }
    if let Some(at) = tracker.completed_at_display() {
        spans.push(Span::styled(format!("  at {at}"), Style::default().fg(MUTED)));
    }
    Line::from(spans)
}

fn controls_line(modal: &ReviewModal) -> Line<'static> {
    let mut help = String::from(
        "⇧←/⇧→ frame  ←/→ ±1s  ,/. ±frame  +/- tolerance  Enter submit KIS  a answer  i info  Esc close",
    );
    if modal.is_query_and_qna() {
        help.push_str("  s/v/n answers");
    }
    Line::from(Span::styled(help, Style::default().fg(MUTED)))
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn status_pill(status: SubmissionStatus) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    match status {
        SubmissionStatus::Unset => base.bg(Color::Rgb(72, 82, 96)).fg(TEXT),
        SubmissionStatus::Submitting => base.bg(Color::Yellow).fg(Color::Black),
        SubmissionStatus::Success => base.bg(Color::Rgb(120, 200, 140)).fg(Color::Black),
        SubmissionStatus::Error => base.bg(Color::Rgb(255, 145, 120)).fg(Color::Black),
    }
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(TEXT)
    }
}
