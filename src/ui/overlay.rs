use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::prompt::PromptView;

use super::layout::centered_rect;

/// Centered one-line notice inside the viewer (no image, finalizing, ...).
pub fn draw_placeholder(frame: &mut Frame<'_>, area: Rect, message: &str) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let line = centered_rect(area, area.width, 1);
    frame.render_widget(
        Paragraph::new(message.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        line,
    );
}

/// Modal alert. Stays until dismissed.
pub fn draw_alert_overlay(frame: &mut Frame<'_>, area: Rect, message: &str) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let popup_width = area.width.min(50);
    let popup_height = area.height.min(6);
    let popup = centered_rect(area, popup_width, popup_height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Alert ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let lines = vec![
        Line::from(message.to_string()),
        Line::default(),
        Line::from(Span::styled(
            "Enter/Esc to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

pub fn draw_prompt_overlay(frame: &mut Frame<'_>, area: Rect, view: &PromptView) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let hint_rows = view.hints.len() as u16;
    let popup_width = area.width.min(60);
    let popup_height = (4 + hint_rows).min(area.height);
    let popup = centered_rect(area, popup_width, popup_height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", view.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    // Software caret; the terminal cursor stays hidden.
    let input_line = build_prompt_input_line(&view.input, view.cursor, chunks[0].width as usize);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    if chunks[1].height == 0 || view.hints.is_empty() {
        return;
    }
    let hints: Vec<Line<'_>> = std::iter::once(Line::default())
        .chain(view.hints.iter().map(|hint| {
            Line::from(vec![
                Span::raw("   "),
                Span::styled(hint.as_str(), Style::default().fg(Color::DarkGray)),
            ])
        }))
        .collect();
    frame.render_widget(Paragraph::new(hints), chunks[1]);
}

fn build_prompt_input_line(input: &str, cursor: usize, width: usize) -> Line<'static> {
    let prefix_spans = vec![
        Span::raw(" ".to_string()),
        Span::styled("> ".to_string(), Style::default().fg(Color::White)),
    ];
    let prefix_width = 3;
    let max_text_width = width.saturating_sub(prefix_width);

    let chars: Vec<char> = input.chars().collect();
    let char_count = chars.len();
    let cursor = cursor.min(char_count);

    let start = if max_text_width == 0 {
        char_count
    } else if cursor >= max_text_width {
        cursor
            .saturating_sub(max_text_width.saturating_sub(1))
            .min(char_count)
    } else {
        0
    };

    let text_width = max_text_width.max(1);
    let end = (start + text_width).min(char_count);
    let mut visible: Vec<char> = chars[start..end].to_vec();
    if visible.len() < text_width {
        visible.extend(std::iter::repeat_n(' ', text_width - visible.len()));
    }

    let caret_idx = cursor
        .saturating_sub(start)
        .min(text_width.saturating_sub(1));

    let mut spans = prefix_spans;
    for (idx, ch) in visible.into_iter().enumerate() {
        if idx == caret_idx {
            spans.push(Span::styled(ch.to_string(), Style::default().reversed()));
        } else {
            spans.push(Span::raw(ch.to_string()));
        }
    }
    Line::from(spans)
}
