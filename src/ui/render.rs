use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, LoginFocus, ResetFocus, Screen, Tab};

use super::styles;
use super::tabs::{overview, plans, settings, users};

pub fn render(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::Login => render_login_screen(frame, app),
        Screen::ForgotPassword => render_forgot_screen(frame, app),
        Screen::VerifyOtp => render_otp_screen(frame, app),
        Screen::ResetPassword => render_reset_screen(frame, app),
        Screen::Dashboard => render_dashboard(frame, app),
    }

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame, app);
    }

    if matches!(app.state, AppState::Searching) {
        render_search_overlay(frame, app);
    }

    if matches!(app.state, AppState::EditingPlan) {
        plans::render_plan_editor(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  FX Admin";
    let help_hint = "[?] Help";

    let admin = app
        .profile
        .as_ref()
        .map(|p| format!("{} ({})", p.display_name(), p.handle()))
        .unwrap_or_default();

    let padding = area
        .width
        .saturating_sub((title.len() + admin.len() + help_hint.len() + 6) as u16)
        as usize;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(admin, styles::muted_style()),
        Span::raw("  "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = vec![
        ("[1] Overview", app.tab == Tab::Overview),
        ("[2] Users", app.tab == Tab::Users),
        ("[3] Plans", app.tab == Tab::Plans),
        ("[4] Settings", app.tab == Tab::Settings),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        if *selected {
            spans.push(Span::styled(*label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(*label, styles::muted_style()));
        }
    }

    // Show the active search filter on the right
    let filter = match app.tab {
        Tab::Users if !app.users_search.is_empty() => {
            Some(format!("filter: \"{}\"", app.users_search))
        }
        Tab::Plans if !app.plans_search.is_empty() => {
            Some(format!("filter: \"{}\"", app.plans_search))
        }
        _ => None,
    };

    if let Some(filter) = filter {
        let main_width: usize = spans.iter().map(|s| s.content.len()).sum();
        let padding = (area.width as usize).saturating_sub(main_width + filter.len() + 2);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(filter, styles::search_style()));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.tab {
        Tab::Overview => overview::render(frame, app, area),
        Tab::Users => users::render(frame, app, area),
        Tab::Plans => plans::render(frame, app, area),
        Tab::Settings => settings::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.tab {
        Tab::Users => "[/] search | [n/p] page | [u]pdate | [q]uit",
        Tab::Plans => "[/] search | [n/p] page | [e]dit | [a]dd | [u]pdate | [q]uit",
        _ => "[u]pdate | [q]uit",
    };

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        String::from(" Ready ")
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Auth screens
// ============================================================================

/// Render one bracketed input field with a cursor when focused.
fn field_line<'a>(label: &'a str, value: &str, focused: bool, masked: bool) -> Line<'a> {
    let display = if masked {
        "*".repeat(value.chars().count().min(24))
    } else {
        value.chars().rev().take(24).collect::<Vec<_>>().iter().rev().collect()
    };
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<10}[", label), styles::muted_style()),
        Span::styled(format!("{:<24}{}", display, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn button_line(label: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw("            ["),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}

fn auth_screen(frame: &mut Frame, title: &str, mut lines: Vec<Line>, error: &Option<String>, hint: &str) {
    let height = 10 + lines.len() as u16 + if error.is_some() { 2 } else { 0 };
    let area = centered_rect_fixed(52, height, frame.area());

    frame.render_widget(Clear, area);

    let mut content = vec![
        Line::from(Span::styled("      ╔═╗─┐ ┬  ╔═╗╔╦╗╔╦╗╦╔╗╔", styles::title_style())),
        Line::from(Span::styled("      ╠╣ ┌┴┬┘  ╠═╣ ║║║║║║║║║", styles::title_style())),
        Line::from(Span::styled("      ╚  ┴ └─  ╩ ╩═╩╝╩ ╩╩╝╚╝", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(format!("  {}", title), styles::highlight_style())),
        Line::from(""),
    ];
    content.append(&mut lines);

    if let Some(error) = error {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        format!("  {}", hint),
        styles::muted_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_login_screen(frame: &mut Frame, app: &App) {
    let mut lines = vec![
        field_line(
            "Email:",
            &app.login.email,
            app.login.focus == LoginFocus::Email,
            false,
        ),
        field_line(
            "Password:",
            &app.login.password,
            app.login.focus == LoginFocus::Password,
            true,
        ),
        Line::from(""),
        button_line("Sign in", app.login.focus == LoginFocus::Button),
    ];

    if let Some(ref msg) = app.status_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", msg),
            styles::success_style(),
        )));
    }

    auth_screen(
        frame,
        "Sign in to your admin account",
        lines,
        &app.login.error,
        "Tab: next field | Enter: submit | [F2] forgot password",
    );
}

fn render_forgot_screen(frame: &mut Frame, app: &App) {
    let lines = vec![
        field_line("Email:", &app.forgot.email, true, false),
        Line::from(""),
        Line::from(Span::styled(
            "  We will email a one-time code to this address.",
            styles::muted_style(),
        )),
    ];

    auth_screen(
        frame,
        "Forgot password",
        lines,
        &app.forgot.error,
        "Enter: send code | Esc: back to sign-in",
    );
}

fn render_otp_screen(frame: &mut Frame, app: &App) {
    let lines = vec![
        Line::from(vec![
            Span::styled("  Code sent to ", styles::muted_style()),
            Span::styled(app.reset_email.clone(), styles::highlight_style()),
        ]),
        Line::from(""),
        field_line("Code:", &app.otp.otp, true, false),
    ];

    auth_screen(
        frame,
        "Verify one-time code",
        lines,
        &app.otp.error,
        "Enter: verify | Esc: back",
    );
}

fn render_reset_screen(frame: &mut Frame, app: &App) {
    let lines = vec![
        field_line(
            "New:",
            &app.reset.password,
            app.reset.focus == ResetFocus::Password,
            true,
        ),
        field_line(
            "Confirm:",
            &app.reset.confirm,
            app.reset.focus == ResetFocus::Confirm,
            true,
        ),
    ];

    auth_screen(
        frame,
        "Set a new password",
        lines,
        &app.reset.error,
        "Tab: next field | Enter: submit | Esc: back",
    );
}

// ============================================================================
// Overlays
// ============================================================================

fn render_search_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(vec![
            Span::styled(" Search: ", styles::muted_style()),
            Span::styled(format!("{}▌", app.search_input), styles::search_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Enter: apply | Esc: cancel",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Search {} ", app.tab.title()))
        .title_style(styles::muted_style())
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame, _app: &App) {
    let area = centered_rect_fixed(52, 22, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("      ╔═╗─┐ ┬  ╔═╗╔╦╗╔╦╗╦╔╗╔", styles::title_style())),
        Line::from(Span::styled("      ╠╣ ┌┴┬┘  ╠═╣ ║║║║║║║║║", styles::title_style())),
        Line::from(Span::styled("      ╚  ┴ └─  ╩ ╩═╩╝╩ ╩╩╝╚╝", styles::title_style())),
        Line::from(Span::styled(
            format!("              version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  1-4       ", styles::help_key_style()),
            Span::styled("Switch tabs", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ←/→       ", styles::help_key_style()),
            Span::styled("Prev/next tab", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓       ", styles::help_key_style()),
            Span::styled("Navigate list", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  n/p       ", styles::help_key_style()),
            Span::styled("Next/previous page", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  /         ", styles::help_key_style()),
            Span::styled("Search (Users and Plans tabs)", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  e / a     ", styles::help_key_style()),
            Span::styled("Edit / add plan (Plans tab)", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  u         ", styles::help_key_style()),
            Span::styled("Update data from the server", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  q         ", styles::help_key_style()),
            Span::styled("Quit", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
