use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::models::UserStatus;
use crate::ui::styles;
use crate::utils::format::{format_currency, format_date, truncate_string};

/// Render the Users tab - paginated table of all registered users.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(2)])
        .split(area);

    render_user_table(frame, app, chunks[0]);
    render_pagination_footer(frame, app, chunks[1]);
}

fn render_user_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Email"),
        Cell::from("Joined"),
        Cell::from("Spent"),
        Cell::from("Plan"),
        Cell::from("Status"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let style = if i == app.users_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let paid = user.status == UserStatus::Paid;

            Row::new(vec![
                Cell::from(truncate_string(&user.name, 24)),
                Cell::from(truncate_string(&user.email, 30)),
                Cell::from(format_date(user.joined_date.as_deref())),
                Cell::from(format_currency(user.spent_on_subscription, "EUR")),
                Cell::from(user.plan_name.clone()),
                Cell::from(Span::styled(user.status.to_string(), styles::status_style(paid))),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(22),
        Constraint::Percentage(28),
        Constraint::Length(11),
        Constraint::Length(12),
        Constraint::Fill(1),
        Constraint::Length(7),
    ];

    let title = format!(" Users ({} total) ", app.users_meta.total);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.users_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_pagination_footer(frame: &mut Frame, app: &App, area: Rect) {
    let meta = &app.users_meta;
    let left = format!(" {} ", meta.results_label());
    let right = format!(
        " Page {}/{} [n]ext [p]rev ",
        meta.page.max(1),
        meta.total_pages.max(1)
    );

    let padding = (area.width as usize)
        .saturating_sub(left.len())
        .saturating_sub(right.len());

    let line = Line::from(vec![
        Span::styled(left, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style()),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}
