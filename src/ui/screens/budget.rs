use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::ui::app::App;
use crate::ui::render::panel;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let month = app.reference_month();
    let rows = &app.dashboard.budget;

    if rows.is_empty() {
        let headline = if app.budget.is_some() {
            format!("No categories with a limit above zero for {month}")
        } else {
            format!("No budget set for {month}")
        };
        render_empty(f, area, &headline);
        return;
    }

    let total = app
        .budget
        .as_ref()
        .map(|b| b.total_budgeted())
        .unwrap_or_default();

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .skip(app.budget_scroll)
        .take(app.budget_page())
        .map(|(i, row)| {
            let usage = row.usage();
            let color = theme::usage_color(usage.to_f64().unwrap_or(0.0), row.is_over_budget());

            let name_style = if i == app.budget_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let remaining = if row.is_over_budget() {
                format!("over by {}", format_amount(row.actual - row.budgeted))
            } else {
                format!("{} left", format_amount(row.remaining))
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<16}", truncate(&row.category, 15)), name_style),
                Span::styled(
                    format!(
                        "{:>11} / {:<11} ",
                        format_amount(row.actual),
                        format_amount(row.budgeted)
                    ),
                    Style::default().fg(color),
                ),
                Span::styled(progress_bar(usage, 20), Style::default().fg(color)),
                Span::styled(
                    format!(" {:>4.0}% ", usage),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(remaining, theme::dim_style()),
            ]))
        })
        .collect();

    let list = List::new(items).block(panel(format!(
        "Budget for {month} ({} budgeted)",
        format_amount(total)
    )));
    f.render_widget(list, area);
}

fn render_empty(f: &mut Frame, area: Rect, headline: &str) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(headline.to_string(), theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Use :budget <category> <amount> to set a spending limit",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(panel("Budget"));
    f.render_widget(msg, area);
}
