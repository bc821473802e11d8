use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::render::panel;
use crate::ui::theme;
use crate::ui::util::{bar_value, format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Min(8),    // Recent + monthly chart
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    render_recent(f, lower[0], app);
    render_monthly_chart(f, lower[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let summary = &app.dashboard.summary;
    let net_color = if summary.is_saving() {
        theme::GREEN
    } else {
        theme::RED
    };

    render_card(
        f,
        cards[0],
        "Total Income",
        format_amount(summary.total_income),
        theme::GREEN,
    );
    render_card(
        f,
        cards[1],
        "Total Expenses",
        format_amount(summary.total_expenses),
        theme::RED,
    );
    render_card(
        f,
        cards[2],
        "Net Savings",
        format_amount(summary.net_savings),
        net_color,
    );
    render_card(
        f,
        cards[3],
        "Transactions",
        app.dashboard.transaction_count.to_string(),
        theme::ACCENT,
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(panel(title));

    f.render_widget(text, area);
}

fn render_recent(f: &mut Frame, area: Rect, app: &App) {
    let recent = &app.dashboard.recent;
    if recent.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No transactions yet", theme::dim_style())),
            Line::from(Span::styled(
                "Add one with :add <date> <amount> <category> <description>",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(panel("Recent Transactions"));
        f.render_widget(msg, area);
        return;
    }

    let rows: Vec<Row> = recent
        .iter()
        .map(|txn| {
            let (shown, style) = if txn.is_income() {
                (format!("+{}", format_amount(txn.amount)), theme::income_style())
            } else {
                (format_amount(-txn.amount), theme::expense_style())
            };
            Row::new(vec![
                Cell::from(txn.date.format("%b %d").to_string()),
                Cell::from(truncate(&txn.description, 24)),
                Cell::from(Span::styled(shown, style)),
            ])
            .style(theme::normal_style())
        })
        .collect();

    let widths = [
        Constraint::Length(7),
        Constraint::Min(10),
        Constraint::Length(14),
    ];
    let table = Table::new(rows, widths).block(panel("Recent Transactions"));
    f.render_widget(table, area);
}

fn render_monthly_chart(f: &mut Frame, area: Rect, app: &App) {
    let monthly = &app.dashboard.monthly;
    let all_zero = monthly
        .iter()
        .all(|m| m.income == Decimal::ZERO && m.expenses == Decimal::ZERO);

    let title = format!("Income vs Expenses ({} months)", monthly.len());
    if monthly.is_empty() || all_zero {
        let msg = Paragraph::new(Line::from(Span::styled(
            format!("No activity in the {} months to {}", monthly.len(), app.reference_month()),
            theme::dim_style(),
        )))
        .centered()
        .block(panel(title));
        f.render_widget(msg, area);
        return;
    }

    let mut chart = BarChart::default()
        .block(panel(title))
        .bar_width(4)
        .bar_gap(0)
        .group_gap(2)
        .value_style(Style::default().fg(theme::TEXT));

    for row in monthly {
        let bars = [
            Bar::default()
                .value(bar_value(row.income))
                .text_value(String::new())
                .style(theme::income_style()),
            Bar::default()
                .value(bar_value(row.expenses))
                .text_value(String::new())
                .style(theme::expense_style()),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(row.month_label.clone()))
                .bars(&bars),
        );
    }

    f.render_widget(chart, area);
}
