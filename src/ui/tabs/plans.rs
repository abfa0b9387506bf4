use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, PlanField};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;
use crate::utils::format::{format_currency, truncate_string};

/// Render the Plans tab - plan table on the left, selected plan detail on
/// the right, with a pagination footer under the table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(2)])
        .split(columns[0]);

    render_plan_table(frame, app, left[0]);
    render_pagination_footer(frame, app, left[1]);
    render_plan_detail(frame, app, columns[1]);
}

fn render_plan_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Name"),
        Cell::from("Price"),
        Cell::from("Cycle"),
        Cell::from("Active"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .plans
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            let style = if i == app.plans_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            Row::new(vec![
                Cell::from(plan.icon.glyph()),
                Cell::from(truncate_string(&plan.name, 20)),
                Cell::from(format_currency(plan.price, &plan.currency)),
                Cell::from(plan.billing_cycle.label()),
                Cell::from(if plan.is_active { "yes" } else { "no" }),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Fill(2),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(6),
    ];

    let title = format!(" Plans ({} total) - [e]dit [a]dd ", app.plans_meta.total);

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
    state.select(Some(app.plans_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_plan_detail(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.plans.get(app.plans_selection) {
        Some(plan) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled(plan.icon.glyph(), styles::highlight_style()),
                    Span::raw(" "),
                    Span::styled(plan.name.clone(), styles::title_style()),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Price:    ", styles::muted_style()),
                    Span::raw(format!(
                        "{} {}",
                        format_currency(plan.price, &plan.currency),
                        plan.billing_cycle.label()
                    )),
                ]),
                Line::from(vec![
                    Span::styled("Active:   ", styles::muted_style()),
                    if plan.is_active {
                        Span::styled("yes", styles::success_style())
                    } else {
                        Span::styled("no", styles::error_style())
                    },
                ]),
                Line::from(vec![
                    Span::styled("Order:    ", styles::muted_style()),
                    Span::raw(plan.sort_order.to_string()),
                ]),
            ];

            if !plan.description.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::raw(plan.description.clone())));
            }

            if !plan.benefits.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Benefits",
                    styles::highlight_style(),
                )));
                for benefit in &plan.benefits {
                    lines.push(Line::from(format!("  • {}", benefit)));
                }
            }

            lines
        }
        None => vec![Line::from(Span::styled(
            " No plan selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_pagination_footer(frame: &mut Frame, app: &App, area: Rect) {
    let meta = &app.plans_meta;
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

// ============================================================================
// Plan editor overlay
// ============================================================================

fn editor_field<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<10}", label), styles::muted_style()),
        Span::styled(format!("{}{}", value, cursor), style),
    ])
}

pub fn render_plan_editor(frame: &mut Frame, app: &App) {
    let Some(editor) = app.plan_editor.as_ref() else {
        return;
    };

    let height = if editor.error.is_some() { 18 } else { 16 };
    let area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, area);

    let title = if editor.id.is_some() {
        " Edit Plan "
    } else {
        " New Plan "
    };

    let mut lines = vec![
        Line::from(""),
        editor_field("Name", editor.name.clone(), editor.focus == PlanField::Name),
        editor_field("Price", editor.price.clone(), editor.focus == PlanField::Price),
        editor_field(
            "Descr.",
            editor.description.clone(),
            editor.focus == PlanField::Description,
        ),
        editor_field(
            "Benefits",
            editor.benefits.clone(),
            editor.focus == PlanField::Benefits,
        ),
        editor_field(
            "Icon",
            format!("{} (Space to cycle)", editor.icon.glyph()),
            editor.focus == PlanField::Icon,
        ),
        editor_field(
            "Cycle",
            format!("{} (Space to toggle)", editor.billing_cycle.label()),
            editor.focus == PlanField::BillingCycle,
        ),
        editor_field(
            "Accent",
            editor.accent_color.clone(),
            editor.focus == PlanField::AccentColor,
        ),
        editor_field(
            "Active",
            format!("{} (Space to toggle)", if editor.is_active { "yes" } else { "no" }),
            editor.focus == PlanField::Active,
        ),
    ];

    if let Some(ref error) = editor.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab: next field | Ctrl+S: save | Esc: cancel",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
