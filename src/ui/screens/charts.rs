use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::render::panel;
use crate::ui::theme;
use crate::ui::util::{bar_value, format_amount, format_percent, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_breakdown_chart(f, chunks[0], app);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_breakdown_table(f, lower[0], app);
    render_monthly_table(f, lower[1], app);
}

fn render_breakdown_chart(f: &mut Frame, area: Rect, app: &App) {
    let breakdown = &app.dashboard.breakdown;
    if breakdown.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses recorded",
            theme::dim_style(),
        )))
        .centered()
        .block(panel("Spending by Category"));
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = breakdown
        .iter()
        .map(|row| {
            Bar::default()
                .value(bar_value(row.total_amount))
                .label(Line::from(truncate(&row.category, 10)))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(panel("Spending by Category"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_breakdown_table(f: &mut Frame, area: Rect, app: &App) {
    let total = app.dashboard.summary.total_expenses;
    let header = Row::new(
        ["Category", "Amount", "Share"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = app
        .dashboard
        .breakdown
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(row.category.clone()),
                Cell::from(format_amount(row.total_amount)),
                Cell::from(format_percent(row.share_of(total))),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(14),
        Constraint::Length(14),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(format!("Breakdown ({})", format_amount(total))));
    f.render_widget(table, area);
}

fn render_monthly_table(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(
        ["Month", "Income", "Expenses", "Net"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = app
        .dashboard
        .monthly
        .iter()
        .map(|row| {
            let net = row.net();
            let net_style = if net < Decimal::ZERO {
                theme::expense_style()
            } else {
                theme::income_style()
            };
            let style = if row.month_key == app.reference_month() {
                Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(format!("{} {}", row.month_label, row.month_key.year())),
                Cell::from(format_amount(row.income)),
                Cell::from(format_amount(row.expenses)),
                Cell::from(Span::styled(format_amount(net), net_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Min(12),
    ];
    let table = Table::new(rows, widths).header(header).block(panel(format!(
        "Monthly ({} to {})",
        app.reference_month().offset(1 - app.config.window_size as i64),
        app.reference_month()
    )));
    f.render_widget(table, area);
}
