//! TUI rendering for Seen It using ratatui.

mod input;
mod theme;

pub use input::{Action, InputPump, apply_action, handle_events, key_action};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles, tier_badge};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use seenit_engine::{App, FailureKind, Feedback, GameView, Notification, PhaseView, UiOptions};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let view = app.view();

    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(5),    // Glyph card
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Feedback
            Constraint::Length(1), // Notification
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_status_bar(frame, &view, chunks[0], options, &palette, &glyphs);
    draw_card(frame, app, &view, chunks[1], &palette);
    draw_progress(frame, &view, chunks[2], &palette, &glyphs);
    draw_feedback(frame, &view, chunks[3], &palette, &glyphs);
    draw_notification(frame, &view, chunks[4], options, &palette, &glyphs);
    draw_key_hints(frame, &view, chunks[5], &palette, &glyphs);
}

fn draw_status_bar(
    frame: &mut Frame,
    view: &GameView<'_>,
    area: Rect,
    options: UiOptions,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let badge = tier_badge(view.tier.icon(), view.tier.name(), options);
    let muted = Style::default().fg(palette.text_muted);
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("{badge} {}", view.tier.name()), styles::tier_name(palette)),
        Span::styled(
            format!("  tier {}/{}", view.tier_index + 1, view.tier_count),
            muted,
        ),
        Span::styled("  │  ", muted),
        Span::styled(format!("{} {}", glyphs.score, view.score), styles::score(palette)),
        Span::styled("  │  ", muted),
        Span::styled(
            format!("{} best {}", glyphs.best, view.best_score),
            Style::default().fg(palette.text_secondary),
        ),
    ]));
    frame.render_widget(status, area);
}

fn draw_card(frame: &mut Frame, app: &App, view: &GameView<'_>, area: Rect, palette: &Palette) {
    let (title, border_color) = match view.phase {
        PhaseView::Loading => (" Dealing ", palette.bg_border),
        PhaseView::Playing => (" Seen it? ", palette.primary),
        PhaseView::Failed(_) => (" Error ", palette.error),
    };

    let lines = match (view.phase, view.visible) {
        (PhaseView::Playing, Some(glyph)) => vec![
            Line::from(""),
            Line::from(Span::styled(
                glyph.to_string(),
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("U+{:04X}", glyph.codepoint()),
                Style::default().fg(palette.text_muted),
            )),
            Line::from(Span::styled(
                format!("{} in pool · {} seen", view.pool_size, view.seen_count),
                Style::default().fg(palette.text_muted),
            )),
        ],
        (PhaseView::Failed(failure), _) => {
            let hint = match failure.kind {
                FailureKind::SourceUnavailable => "Press r to try again",
                FailureKind::EmptyPool => "Pick another source in config.toml, or press r",
            };
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    failure.kind.label(),
                    Style::default()
                        .fg(palette.error)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    failure.message.clone(),
                    Style::default().fg(palette.text_secondary),
                )),
                Line::from(""),
                Line::from(Span::styled(hint, Style::default().fg(palette.text_muted))),
            ]
        }
        _ => {
            let spinner = spinner_frame(app.tick_count(), app.ui_options());
            vec![
                Line::from(""),
                Line::from(""),
                Line::from(Span::styled(
                    format!("{spinner} Fetching glyphs from {}", app.selector()),
                    Style::default().fg(palette.primary),
                )),
            ]
        }
    };

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color))
                .title(title)
                .style(Style::default().bg(palette.bg_panel))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(card, area);
}

/// Progress toward the next threshold as a bar followed by a label.
fn progress_line(view: &GameView<'_>, width: u16, palette: &Palette, glyphs: &Glyphs) -> Line<'static> {
    let label = match view.next_threshold {
        Some(next) => format!(" {}/{next}", view.score),
        None => " top tier".to_string(),
    };
    let bar_width = usize::from(width).saturating_sub(label.width() + 1);
    let filled = ((bar_width as f64) * view.progress).round() as usize;
    let filled = filled.min(bar_width);

    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            glyphs.gauge_fill.repeat(filled),
            Style::default().fg(palette.accent),
        ),
        Span::styled(
            "·".repeat(bar_width - filled),
            Style::default().fg(palette.bg_border),
        ),
        Span::styled(label, Style::default().fg(palette.text_secondary)),
    ])
}

fn draw_progress(frame: &mut Frame, view: &GameView<'_>, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let line = progress_line(view, area.width, palette, glyphs);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_feedback(frame: &mut Frame, view: &GameView<'_>, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let line = match view.feedback {
        Feedback::None => Line::from(""),
        Feedback::Correct => Line::from(Span::styled(
            format!(" {} Correct", glyphs.correct),
            styles::correct(palette),
        )),
        Feedback::Wrong => Line::from(Span::styled(
            format!(" {} Wrong", glyphs.wrong),
            styles::wrong(palette),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Banner text for a notification.
#[must_use]
pub fn notification_text(notification: &Notification, options: UiOptions) -> String {
    let glyphs = glyphs(options);
    match notification {
        Notification::Lost {
            final_score,
            glyph,
            was_seen,
        } => {
            let truth = if *was_seen { "already seen" } else { "new" };
            format!(
                "Round over at {final_score}. {glyph} (U+{:04X}) was {truth}.",
                glyph.codepoint()
            )
        }
        Notification::Promoted {
            tier_name,
            tier_icon,
        } => format!(
            "{} Promoted to {} {tier_name}!",
            glyphs.promoted,
            tier_badge(tier_icon, tier_name, options)
        ),
    }
}

fn draw_notification(
    frame: &mut Frame,
    view: &GameView<'_>,
    area: Rect,
    options: UiOptions,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let Some(notification) = view.notification else {
        return;
    };
    let style = match notification {
        Notification::Lost { .. } => styles::banner_lost(palette),
        Notification::Promoted { .. } => styles::banner_promoted(palette),
    };
    let text = format!(" {} {} ", glyphs.bullet, notification_text(notification, options));
    frame.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), area);
}

fn draw_key_hints(frame: &mut Frame, view: &GameView<'_>, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let key = styles::key_highlight(palette);
    let hint = styles::key_hint(palette);
    let mut spans = vec![Span::raw(" ")];
    match view.phase {
        PhaseView::Playing => {
            spans.extend([
                Span::styled(format!("s/{}", glyphs.arrow_left), key),
                Span::styled(" seen  ", hint),
                Span::styled(format!("n/{}", glyphs.arrow_right), key),
                Span::styled(" new  ", hint),
            ]);
        }
        PhaseView::Failed(_) => {
            spans.extend([Span::styled("r", key), Span::styled(" retry  ", hint)]);
        }
        PhaseView::Loading => {}
    }
    spans.extend([Span::styled("q", key), Span::styled(" quit", hint)]);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
