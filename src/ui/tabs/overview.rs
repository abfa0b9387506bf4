use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::format_currency;

/// Width of one bar in the joinings chart.
const BAR_WIDTH: usize = 30;

/// Render the Overview tab - stat cards plus the joinings-per-month chart.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(area);

    render_stat_cards(frame, app, chunks[0]);
    render_joinings_chart(frame, app, chunks[1]);
}

fn render_stat_cards(frame: &mut Frame, app: &App, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    let (total_users, active_subs, revenue) = match app.stats {
        Some(ref s) => (
            s.total_users.to_string(),
            s.active_subscriptions.to_string(),
            format_currency(s.total_revenue, "EUR"),
        ),
        None => ("-".to_string(), "-".to_string(), "-".to_string()),
    };

    render_card(frame, cards[0], "Total Users", &total_users);
    render_card(frame, cards[1], "Active Subscriptions", &active_subs);
    render_card(frame, cards[2], "Total Revenue", &revenue);
}

fn render_card(frame: &mut Frame, area: Rect, label: &str, value: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", value),
            styles::title_style(),
        )),
    ];

    let block = Block::default()
        .title(format!(" {} ", label))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_joinings_chart(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![];

    match app.stats {
        Some(ref stats) if !stats.monthly_joinings.is_empty() => {
            let peak = stats.peak_monthly_count().max(1);
            for point in &stats.monthly_joinings {
                let filled = ((point.count as f64 / peak as f64) * BAR_WIDTH as f64) as usize;
                let bar = "█".repeat(filled);
                let rest = "░".repeat(BAR_WIDTH - filled);
                lines.push(Line::from(vec![
                    Span::styled(format!(" {:<4}", point.label), styles::muted_style()),
                    Span::styled(bar, styles::title_style()),
                    Span::styled(rest, styles::muted_style()),
                    Span::styled(format!(" {}", point.count), styles::list_item_style()),
                ]));
            }
        }
        Some(_) => {
            lines.push(Line::from(Span::styled(
                " No joinings recorded for this year",
                styles::muted_style(),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                " Loading...",
                styles::muted_style(),
            )));
        }
    }

    let year = app.stats.as_ref().map(|s| s.year).unwrap_or_default();
    let title = if year > 0 {
        format!(" New Users by Month ({}) ", year)
    } else {
        " New Users by Month ".to_string()
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
