//! Rendering - pure functions from state to frame
//!
//! No business logic here; everything reads [`AppState`] and draws.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::state::AppState;
use super::theme::Theme;

pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search box
            Constraint::Min(5),    // Book list
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], state, theme);
    render_search(frame, chunks[1], state, theme);
    render_books(frame, chunks[2], state, theme);
    render_footer(frame, chunks[3], theme);

    if state.recommendations.visible || state.rec_loading {
        render_recommendations(frame, area, state, theme);
    }

    render_notifications(frame, area, state, theme);
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let session_span = if state.session.is_some() {
        Span::styled("recommendations ready", theme.success())
    } else {
        Span::styled("recommendations offline", theme.dimmed())
    };

    let header = Line::from(vec![
        Span::styled("📚 LIBRI", theme.header()),
        Span::raw("  │  "),
        Span::styled(
            format!("{} books", state.books.len()),
            theme.text(),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!("{} favorites", state.favorites.len()),
            theme.favorite(),
        ),
        Span::raw("  │  "),
        session_span,
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.dimmed())
        .title(" CATALOG ");

    frame.render_widget(Paragraph::new(header).block(block), area);
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let mut spans = vec![Span::styled(&state.query, theme.text())];
    spans.push(Span::styled("█", theme.accent()));
    if state.list_loading {
        spans.push(Span::styled("  searching…", theme.dimmed()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.accent())
        .title(" 🔎 SEARCH ");

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_books(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let items: Vec<ListItem> = state
        .books
        .iter()
        .map(|book| {
            let marker = if book.is_favorite { "♥" } else { "♡" };
            let marker_style = if book.is_favorite {
                theme.favorite()
            } else {
                theme.dimmed()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {marker} "), marker_style),
                Span::styled(book.name.clone(), theme.text()),
                Span::styled(format!("  {}", book.price_formatted), theme.accent()),
                Span::styled(
                    format!("  [{} · {}]", book.language, book.genre),
                    theme.dimmed(),
                ),
            ]))
        })
        .collect();

    let title = if state.query.is_empty() {
        " BOOKS ".to_string()
    } else {
        format!(" BOOKS matching \"{}\" ", state.query)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.dimmed())
        .title(title);

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.highlight())
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    if !state.books.is_empty() {
        list_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_recommendations(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let popup = centered_rect(70, 50, area);
    frame.render_widget(Clear, popup);

    let body = if state.rec_loading {
        Line::from(Span::styled("Asking the librarian…", theme.dimmed()))
    } else {
        Line::from(Span::styled(state.recommendations.text.clone(), theme.text()))
    };

    let title = format!(" 💡 BECAUSE YOU LIKED {} ", state.recommendations.selected_book);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.accent())
        .title(title)
        .title_bottom(Line::from(" Esc to close ").alignment(Alignment::Right));

    frame.render_widget(
        Paragraph::new(body).wrap(Wrap { trim: true }).block(block),
        popup,
    );
}

fn render_notifications(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    // Up to three newest toasts, stacked in the top-right corner.
    for (i, notification) in state.notifications.iter().take(3).enumerate() {
        let text = format!(
            " {} {}: {} ",
            notification.severity.icon(),
            notification.title,
            notification.message
        );
        let width = (text.chars().count() as u16 + 2).min(area.width);
        let toast = Rect {
            x: area.width.saturating_sub(width + 1),
            y: 1 + (i as u16) * 3,
            width,
            height: 3,
        };
        if toast.bottom() > area.height {
            break;
        }

        frame.render_widget(Clear, toast);
        let style = theme.severity(notification.severity);
        let block = Block::default().borders(Borders::ALL).border_style(style);
        frame.render_widget(
            Paragraph::new(Span::styled(text, style)).block(block),
            toast,
        );
    }
}

fn render_footer(frame: &mut Frame, area: Rect, theme: &Theme) {
    let help = Line::from(vec![
        Span::styled(" type", theme.accent()),
        Span::styled(" to search  ", theme.dimmed()),
        Span::styled("[↑↓]", theme.accent()),
        Span::styled(" select  ", theme.dimmed()),
        Span::styled("[Enter]", theme.accent()),
        Span::styled(" favorite  ", theme.dimmed()),
        Span::styled("[Esc]", theme.accent()),
        Span::styled(" dismiss/clear  ", theme.dimmed()),
        Span::styled("[Ctrl+R]", theme.accent()),
        Span::styled(" reload  ", theme.dimmed()),
        Span::styled("[Ctrl+C]", theme.accent()),
        Span::styled(" quit", theme.dimmed()),
    ]);
    frame.render_widget(Paragraph::new(help), area);
}

/// Centered sub-rectangle taking the given percentages of the area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
