//! Emergency ticket wizard
//!
//! Renders the step indicator, the fields of the active step and the
//! Back/Next buttons. The confirmation gate is drawn as a dialog on top.

use super::field_renderer::{draw_field_with_value, draw_help_text, draw_toggle};
use crate::app::App;
use crate::state::wizard::{EmergencyField, EmergencyType, WizardController, WizardStep};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the wizard for the current step
pub fn draw_emergency(frame: &mut Frame, area: Rect, app: &App) {
    let wizard = &app.state.wizard;
    let step = wizard.step();

    let block = Block::default()
        .title(" Emergency Ticket ")
        .title_style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Stepper
            Constraint::Min(6),                // Step body
            Constraint::Length(1),             // Error
            Constraint::Length(BUTTON_HEIGHT), // Back / Next
            Constraint::Length(1),             // Help
        ])
        .margin(1)
        .split(area);

    draw_stepper(frame, chunks[0], step);

    match step {
        WizardStep::Details => draw_details(frame, chunks[1], wizard),
        WizardStep::LocationContact => draw_location_contact(frame, chunks[1], wizard),
        WizardStep::Review => draw_review(frame, chunks[1], wizard),
    }

    if let Some(error) = wizard.error() {
        let line = Paragraph::new(Span::styled(error, Style::default().fg(Color::Red)));
        frame.render_widget(line, chunks[2]);
    }

    draw_buttons(frame, chunks[3], step);

    let help = match step {
        WizardStep::Details => "Tab:next field  ←/→ or 1-5:type  Enter:next  Esc:cancel",
        WizardStep::LocationContact => "Tab:next field  Enter:next  Esc:back",
        WizardStep::Review => "Tab:next field  Space:toggle  Enter:submit  Esc:back",
    };
    draw_help_text(frame, chunks[4], help);
}

fn draw_stepper(frame: &mut Frame, area: Rect, current: WizardStep) {
    let mut spans = Vec::new();
    for (i, step) in WizardStep::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ── ", Style::default().fg(Color::DarkGray)));
        }
        let style = if *step == current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if step.index() < current.index() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{}. {}", i + 1, step.label()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn text_field(frame: &mut Frame, area: Rect, wizard: &WizardController, field: EmergencyField) {
    let value = field.text(wizard.form()).unwrap_or_default();
    draw_field_with_value(
        frame,
        area,
        field.label(),
        value,
        wizard.focused_field() == Some(field),
        false,
    );
}

fn draw_details(frame: &mut Frame, area: Rect, wizard: &WizardController) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    text_field(frame, chunks[0], wizard, EmergencyField::Title);
    text_field(frame, chunks[1], wizard, EmergencyField::Description);

    let is_active = wizard.focused_field() == Some(EmergencyField::EmergencyType);
    let selected = wizard.form().emergency_type;
    let lines: Vec<Line> = EmergencyType::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let chosen = selected == Some(*t);
            let marker = if chosen { "(•)" } else { "( )" };
            let style = if chosen {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{marker} {} {}", i + 1, t.label()),
                style,
            ))
        })
        .collect();

    let border = if is_active { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(format!(" {} ", EmergencyField::EmergencyType.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    frame.render_widget(Paragraph::new(lines).block(block), chunks[2]);
}

fn draw_location_contact(frame: &mut Frame, area: Rect, wizard: &WizardController) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    text_field(frame, chunks[0], wizard, EmergencyField::Location);
    text_field(frame, chunks[1], wizard, EmergencyField::ContactNumber);
}

fn draw_review(frame: &mut Frame, area: Rect, wizard: &WizardController) {
    let form = wizard.form();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(7),
        ])
        .split(area);

    let toggles = WizardStep::Review.fields();
    for (i, field) in toggles.iter().enumerate() {
        draw_toggle(
            frame,
            chunks[i],
            field.label(),
            field.flag(form).unwrap_or_default(),
            wizard.focused_field() == Some(*field),
        );
    }

    let label = Style::default().fg(Color::DarkGray);
    let summary = vec![
        Line::from(vec![
            Span::styled("Title:    ", label),
            Span::raw(form.title.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Type:     ", label),
            Span::raw(form.emergency_type.map(|t| t.label()).unwrap_or("-")),
        ]),
        Line::from(vec![
            Span::styled("Location: ", label),
            Span::raw(form.location.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Contact:  ", label),
            Span::raw(form.contact_number.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Alerts:   ", label),
            Span::raw(if form.wants_notifications() {
                "notifications will be sent"
            } else {
                "no notifications"
            }),
        ]),
    ];
    let block = Block::default()
        .title(" Summary ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(summary).block(block), chunks[4]);
}

fn draw_buttons(frame: &mut Frame, area: Rect, step: WizardStep) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(0),
            Constraint::Length(16),
        ])
        .split(area);

    let back = if step.prev().is_some() { "← Back" } else { "Cancel" };
    render_button(frame, chunks[0], back, false, true, None);

    let next = if step.is_last() { "Submit →" } else { "Next →" };
    render_button(frame, chunks[2], next, true, true, Some(Color::Red));
}
