use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, AppState, PasswordFocus};
use crate::ui::styles;
use crate::utils::format::initials;

/// Render the Settings tab - profile card plus the change-password form.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_profile(frame, app, chunks[0]);
    render_password_form(frame, app, chunks[1]);
}

fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.profile {
        Some(ref profile) => {
            let avatar_url = profile
                .avatar
                .as_ref()
                .and_then(|a| a.url.as_deref())
                .unwrap_or("-");

            vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(
                        format!(" [{}] ", initials(profile.display_name())),
                        styles::title_style(),
                    ),
                    Span::styled(profile.display_name().to_string(), styles::title_style()),
                ]),
                Line::from(vec![
                    Span::raw("      "),
                    Span::styled(profile.handle(), styles::muted_style()),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled(" Email:  ", styles::muted_style()),
                    Span::raw(profile.email.clone()),
                ]),
                Line::from(vec![
                    Span::styled(" Role:   ", styles::muted_style()),
                    Span::raw(profile.role.clone().unwrap_or_else(|| "-".to_string())),
                ]),
                Line::from(vec![
                    Span::styled(" Avatar: ", styles::muted_style()),
                    Span::styled(avatar_url.to_string(), styles::muted_style()),
                ]),
            ]
        }
        None => vec![Line::from(Span::styled(
            " Loading profile...",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Profile ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn field_line<'a>(label: &'a str, value: &str, focused: bool) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let masked = "*".repeat(value.chars().count().min(24));
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("{:<10}[", label), styles::muted_style()),
        Span::styled(format!("{:<24}{}", masked, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_password_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.password_form;
    let editing = app.state == AppState::EditingPassword;

    let hint = if editing {
        " Tab: next field | Enter: submit | Esc: cancel"
    } else {
        " Press [c] to change your password"
    };

    let mut lines = vec![
        Line::from(""),
        field_line(
            "Current:",
            &form.current,
            editing && form.focus == PasswordFocus::Current,
        ),
        field_line("New:", &form.new, editing && form.focus == PasswordFocus::New),
        field_line(
            "Confirm:",
            &form.confirm,
            editing && form.focus == PasswordFocus::Confirm,
        ),
        Line::from(""),
        Line::from(Span::styled(hint, styles::muted_style())),
    ];

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Change Password ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
