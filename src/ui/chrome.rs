use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, Mode};
use crate::scale::round2;
use crate::session::{ExportState, PointSlot};

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const LABEL_STYLE: Style = Style::new().fg(Color::DarkGray);

pub fn draw_status(frame: &mut Frame<'_>, area: Rect, app: &AppState, presenter_label: &str) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let mode = if app.session.alert().is_some() {
        "ALERT"
    } else {
        match app.mode {
            Mode::Normal => "NORMAL",
            Mode::Prompt => "PROMPT",
        }
    };
    let message = if app.status.message.is_empty() {
        "-"
    } else {
        app.status.message.as_str()
    };
    let status_text = format!(
        "{mode} | zoom {:.2}x | {message} | {presenter_label}",
        app.view.zoom
    );
    frame.render_widget(Paragraph::new(status_text), area);
}

pub fn draw_settings_panel(frame: &mut Frame<'_>, area: Rect, app: &AppState) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let block = Block::default()
        .title(" Scale to PDF ")
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(settings_lines(app)).wrap(Wrap { trim: false }),
        inner,
    );
}

pub(crate) fn settings_lines(app: &AppState) -> Vec<Line<'static>> {
    let session = &app.session;
    let mut lines = Vec::new();

    match session.image() {
        Some(image) => {
            lines.push(field("File", image.file_name()));
            let (width, height) = image.dimensions();
            lines.push(field("Size", format!("{width} x {height} px")));
        }
        None => {
            lines.push(Line::from(vec![
                key_hint("o"),
                Span::raw("Open an image"),
            ]));
        }
    }
    lines.push(Line::default());

    for (key, slot) in [("s", PointSlot::Start), ("e", PointSlot::End)] {
        let mut spans = vec![key_hint(key), Span::raw(session.slot_label(slot))];
        if session.target() == slot && session.image().is_some() {
            spans.push(Span::styled(" <", Style::default().add_modifier(Modifier::BOLD)));
        }
        lines.push(Line::from(spans));
        let location = match session.point(slot).location() {
            Some(point) => format!("({}, {})", point.x, point.y),
            None => "unset".to_string(),
        };
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(location, LABEL_STYLE),
        ]));
    }
    lines.push(Line::default());

    lines.push(Line::from(vec![
        key_hint("d"),
        Span::raw("Physical distance: "),
        Span::raw(text_or_dash(session.physical_distance_text())),
        Span::styled(" ft", LABEL_STYLE),
    ]));
    lines.push(Line::from(vec![
        key_hint("c"),
        Span::raw("Desired scale: "),
        Span::raw(text_or_dash(session.desired_scale_text())),
        Span::styled(" ft/in", LABEL_STYLE),
    ]));
    lines.push(Line::default());

    let export_label = match session.export_state() {
        ExportState::Idle => "Resize",
        ExportState::Finalizing { .. } => "Resize (finalizing...)",
        ExportState::Ready(_) => "Resize (ready)",
    };
    lines.push(Line::from(vec![key_hint("r"), Span::raw(export_label)]));
    if let Some(document) = session.ready_document() {
        let (width_in, height_in) = document.size_on_paper_inches();
        lines.push(field(
            "Zoom factor",
            format!("{}", round2(document.zoom_factor())),
        ));
        lines.push(field(
            "On paper",
            format!("{} x {} in", round2(width_in), round2(height_in)),
        ));
    }

    let download = if session.can_save() {
        Span::raw("Download")
    } else {
        Span::styled("Download (unavailable)", LABEL_STYLE)
    };
    lines.push(Line::from(vec![key_hint("w"), download]));
    if let Some(saved_to) = session.saved_to() {
        lines.push(field("Saved", saved_to.display().to_string()));
    }
    lines
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), LABEL_STYLE),
        Span::raw(value),
    ])
}

fn key_hint(key: &'static str) -> Span<'static> {
    Span::styled(format!("[{key}] "), KEY_STYLE)
}

fn text_or_dash(text: &str) -> String {
    if text.trim().is_empty() {
        "-".to_string()
    } else {
        text.to_string()
    }
}
