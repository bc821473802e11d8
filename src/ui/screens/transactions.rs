use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::models::Category;
use crate::ui::app::App;
use crate::ui::render::panel;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let listed = app.listed_transactions();
    if listed.is_empty() {
        let (msg, hint) = if app.is_searching() {
            (
                format!("No transactions matching '{}'", app.search_input),
                "Press Esc to clear the search".to_string(),
            )
        } else {
            (
                "No transactions recorded".to_string(),
                "Add one with :add 2024-03-05 12.50 Food Lunch".to_string(),
            )
        };
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(msg, theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(panel("Transactions (0)")),
            area,
        );
        return;
    }

    let header_cells = ["ID", "Date", "Description", "Category", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = listed
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(app.transaction_page())
        .map(|(i, txn)| {
            let amount_style = if txn.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            let amount_str = if txn.is_income() {
                format!("+{}", format_amount(txn.amount))
            } else {
                format_amount(-txn.amount)
            };

            // Flag categories outside the predefined set
            let category = if Category::parse(&txn.category).is_some() {
                txn.category.clone()
            } else {
                format!("{}?", txn.category)
            };

            let style = if i == app.transaction_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(txn.id.unwrap_or_default().to_string()),
                Cell::from(txn.date.to_string()),
                Cell::from(truncate(&txn.description, 40)),
                Cell::from(category),
                Cell::from(Span::styled(amount_str, amount_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(14),
    ];

    let position = format!("{}/{}", app.transaction_index + 1, listed.len());
    let title = if app.is_searching() {
        format!("Transactions ({position}) search: '{}'", app.search_input)
    } else {
        format!("Transactions ({position})")
    };
    let table = Table::new(rows, widths).header(header).block(panel(title));

    f.render_widget(table, area);
}
