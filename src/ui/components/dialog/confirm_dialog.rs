//! Confirmation dialogs for irreversible actions

use crate::state::wizard::WizardController;
use crate::state::PendingDeleteAction;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// A two-option dialog: a cancel choice and a confirm choice
struct Choice<'a> {
    title: &'a str,
    accent: Color,
    body: Vec<Line<'a>>,
    confirm_label: &'a str,
    /// true = confirm highlighted, false = cancel highlighted
    confirm_selected: bool,
    /// Replaces the options while the action is running
    busy: Option<&'a str>,
}

/// Render a confirmation dialog for delete action
pub fn render_delete_dialog(frame: &mut Frame, action: &PendingDeleteAction) {
    let display_text = truncate_string(&action.entity_display, 44);
    render_choice(
        frame,
        Choice {
            title: "Confirm Delete",
            accent: Color::Red,
            body: vec![
                Line::from(Span::styled(
                    "Are you sure you want to delete ",
                    Style::default().fg(Color::White),
                )),
                Line::from(vec![
                    Span::styled(
                        format!("#{} ", action.ticket_id),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(display_text, Style::default().fg(Color::White)),
                    Span::styled("?", Style::default().fg(Color::White)),
                ]),
            ],
            confirm_label: "Delete",
            confirm_selected: action.selected_option,
            busy: None,
        },
    );
}

/// Render the confirmation gate in front of an emergency submission
pub fn render_submit_dialog(frame: &mut Frame, wizard: &WizardController) {
    let form = wizard.form();
    let emergency_type = form
        .emergency_type
        .map(|t| t.label())
        .unwrap_or("Not selected");

    render_choice(
        frame,
        Choice {
            title: "Submit Emergency Ticket",
            accent: Color::Red,
            body: vec![
                Line::from(Span::styled(
                    "Building management will be alerted immediately.",
                    Style::default().fg(Color::White),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Title: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(truncate_string(&form.title, 40)),
                ]),
                Line::from(vec![
                    Span::styled("Type: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(emergency_type),
                ]),
                Line::from(vec![
                    Span::styled("Location: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(truncate_string(&form.location, 38)),
                ]),
            ],
            confirm_label: "Submit",
            confirm_selected: wizard.confirm_highlighted(),
            busy: wizard.is_in_flight().then_some("Submitting…"),
        },
    );
}

fn render_choice(frame: &mut Frame, choice: Choice) {
    let area = frame.area();

    // Dialog dimensions
    let dialog_width = 54u16;
    let dialog_height = choice.body.len() as u16 + 9;

    // Center the dialog
    let dialog_x = area.x + (area.width.saturating_sub(dialog_width)) / 2;
    let dialog_y = area.y + (area.height.saturating_sub(dialog_height)) / 2;

    let dialog_area = Rect {
        x: dialog_x,
        y: dialog_y,
        width: dialog_width.min(area.width),
        height: dialog_height.min(area.height),
    };

    // Clear the area behind the dialog
    frame.render_widget(Clear, dialog_area);

    let mut content = vec![
        Line::from(Span::styled(
            choice.title,
            Style::default()
                .fg(choice.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    content.extend(choice.body);
    content.push(Line::from(""));

    if let Some(busy) = choice.busy {
        content.push(Line::from(Span::styled(
            busy,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        content.push(Line::from(""));
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            "Please wait",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        // Add options with selection highlighting
        let options = [(false, "Cancel", Color::White), (true, choice.confirm_label, choice.accent)];
        for (is_confirm, label, base_color) in options {
            let is_selected = choice.confirm_selected == is_confirm;
            let prefix = if is_selected { "▸ " } else { "  " };
            let style = if is_selected {
                Style::default().fg(base_color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            content.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));
        }

        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled("↑↓", Style::default().fg(Color::Cyan)),
            Span::styled(" select  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::styled(" confirm  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Cyan)),
            Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
        ]));
    }

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(choice.accent))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::new().bg(Color::Black).fg(Color::White));

    frame.render_widget(dialog, dialog_area);
}

/// Truncate a string to a maximum number of characters with ellipsis
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_counts_chars() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("Überschwemmung im Keller", 10), "Übersch...");
    }
}
