//! Ticket list and detail views

use super::render_scrollable_list;
use crate::app::App;
use crate::state::{DetailFocus, Ticket};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Draw the ticket list
pub fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    draw_search_bar(frame, chunks[0], app);

    let pagination = &app.state.pagination;
    let title = format!(
        " Tickets ({}, {} per page) ",
        pagination.range_label(),
        pagination.rows_per_page
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.state.tickets.is_empty() {
        let message = if app.state.search.is_empty() {
            "No tickets found.\nPress 'n' to create a ticket or 'e' to report an emergency."
        } else {
            "No tickets match the search.\nPress Esc to clear it."
        };
        let content = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .tickets
        .iter()
        .enumerate()
        .map(|(idx, ticket)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸" } else { " " };
            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(format!("#{}", ticket.id), Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(
                    format!("[{}]", ticket.priority.label()),
                    Style::default().fg(ticket.priority.color()),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("[{}]", ticket.status),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(&ticket.title, style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    render_scrollable_list(frame, chunks[1], list, app.state.selected_index);
}

fn draw_search_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (text, border) = match &app.state.search_draft {
        Some(draft) => (
            Line::from(vec![
                Span::raw(draft.as_str()),
                Span::styled("▌", Style::default().fg(Color::Cyan)),
            ]),
            Color::Cyan,
        ),
        None if !app.state.search.is_empty() => {
            (Line::from(app.state.search.as_str()), Color::DarkGray)
        }
        None => (
            Line::from(Span::styled(
                "Press / to search",
                Style::default().fg(Color::DarkGray),
            )),
            Color::DarkGray,
        ),
    };

    let search = Paragraph::new(text).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(search, area);
}

/// Draw the ticket detail
pub fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Some(ticket) = app.state.ticket.as_ref() else {
        let message = Paragraph::new("Loading ticket...")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Ticket ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(message, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    draw_ticket_content(frame, chunks[0], app, ticket);
    draw_comment_input(frame, chunks[1], app);
}

fn draw_ticket_content(frame: &mut Frame, area: Rect, app: &App, ticket: &Ticket) {
    let border_color = match app.state.detail_focus {
        DetailFocus::Content => Color::Cyan,
        DetailFocus::CommentInput => Color::DarkGray,
    };
    let dim = Style::default().fg(Color::DarkGray);

    let mut content = vec![
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(&ticket.status, Style::default().fg(Color::Cyan)),
            Span::raw(" | Priority: "),
            Span::styled(
                ticket.priority.label(),
                Style::default().fg(ticket.priority.color()),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Location: ", dim),
            Span::raw(ticket.location.as_deref().unwrap_or("-")),
        ]),
        Line::from(vec![
            Span::styled("Created: ", dim),
            Span::raw(ticket.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]),
        Line::from(""),
        Line::from(Span::styled("─".repeat(40), dim)),
        Line::from(""),
        Line::from(Span::styled(
            "Description",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    if ticket.description.is_empty() {
        content.push(Line::from(Span::styled("No description provided.", dim)));
    } else {
        for line in ticket.description.lines() {
            content.push(Line::from(line.to_string()));
        }
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        format!("Comments ({})", ticket.comments.len()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));

    if ticket.comments.is_empty() {
        content.push(Line::from(Span::styled("No comments yet.", dim)));
    }
    for comment in &ticket.comments {
        content.push(Line::from(vec![
            Span::styled(&comment.user_name, Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("  {}", comment.created_at.format("%Y-%m-%d %H:%M")),
                dim,
            ),
        ]));
        for line in comment.content.lines() {
            content.push(Line::from(format!("  {line}")));
        }
    }

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(format!(" {} ", ticket.reference()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll_offset as u16, 0));

    frame.render_widget(paragraph, area);
}

fn draw_comment_input(frame: &mut Frame, area: Rect, app: &App) {
    let is_active = app.state.detail_focus == DetailFocus::CommentInput;
    let border = if is_active { Color::Cyan } else { Color::DarkGray };

    let line = if is_active {
        Line::from(vec![
            Span::raw(app.state.comment_draft.as_str()),
            Span::styled("▌", Style::default().fg(Color::Cyan)),
        ])
    } else if app.state.comment_draft.is_empty() {
        Line::from(Span::styled(
            "Press c to write a comment",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(app.state.comment_draft.as_str())
    };

    let input = Paragraph::new(line).block(
        Block::default()
            .title(" Add Comment ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(input, area);
}
