#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use super::dashboard::recent_transactions;
use super::*;
use crate::models::{Budget, MonthKey, Transaction};

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn txn(amount: Decimal, category: &str, date: &str) -> Transaction {
    Transaction::new(
        amount,
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        format!("{category} on {date}"),
        category.into(),
    )
}

fn budget(month_key: &str, limits: &[(&str, Decimal)]) -> Budget {
    let categories: BTreeMap<String, Decimal> = limits
        .iter()
        .map(|(name, limit)| (name.to_string(), *limit))
        .collect();
    Budget::new(month(month_key), categories)
}

fn config(reference: &str, window: usize) -> AnalyticsConfig {
    AnalyticsConfig::new(month(reference)).with_window(window)
}

fn scenario_txns() -> Vec<Transaction> {
    vec![
        txn(dec!(1000), "Income", "2024-03-01"),
        txn(dec!(200), "Food", "2024-03-05"),
    ]
}

fn mixed_txns() -> Vec<Transaction> {
    vec![
        txn(dec!(3000), "Income", "2024-01-31"),
        txn(dec!(1200), "Housing", "2024-01-01"),
        txn(dec!(45.50), "Food", "2024-01-12"),
        txn(dec!(80.25), "Food", "2024-02-03"),
        txn(dec!(60), "Utilities", "2024-02-10"),
        txn(dec!(250), "Income", "2024-02-14"),
        txn(dec!(19.99), "Entertainment", "2024-02-20"),
        txn(dec!(1200), "Housing", "2024-02-01"),
        txn(dec!(35), "Transportation", "2023-12-28"),
    ]
}

// ── Summary ───────────────────────────────────────────────────

#[test]
fn test_summary_scenario() {
    let summary = summarize(&scenario_txns());
    assert_eq!(
        summary,
        Summary {
            total_income: dec!(1000),
            total_expenses: dec!(200),
            net_savings: dec!(800),
        }
    );
    assert!(summary.is_saving());
}

#[test]
fn test_summary_empty_is_zero() {
    assert_eq!(summarize(&[]), Summary::default());
}

#[test]
fn test_summary_splits_every_amount_once() {
    let txns = mixed_txns();
    let summary = summarize(&txns);
    let all: Decimal = txns.iter().map(|t| t.amount).sum();
    assert_eq!(summary.total_income + summary.total_expenses, all);
    assert_eq!(summary.net_savings, summary.total_income - summary.total_expenses);
}

#[test]
fn test_summary_negative_net() {
    let txns = vec![
        txn(dec!(100), "Income", "2024-01-01"),
        txn(dec!(150.75), "Personal", "2024-01-02"),
    ];
    let summary = summarize(&txns);
    assert_eq!(summary.net_savings, dec!(-50.75));
    assert!(!summary.is_saving());
}

#[test]
fn test_summary_unrecognized_category_is_expense() {
    let txns = vec![txn(dec!(12), "Crypto", "2024-01-01")];
    let summary = summarize(&txns);
    assert_eq!(summary.total_expenses, dec!(12));
    assert_eq!(summary.total_income, Decimal::ZERO);
}

#[test]
fn test_summary_sums_negative_amounts_as_given() {
    let txns = vec![
        txn(dec!(100), "Income", "2024-01-01"),
        txn(dec!(40), "Food", "2024-01-02"),
        txn(dec!(-10), "Food", "2024-01-03"),
    ];
    let summary = summarize(&txns);
    assert_eq!(summary.total_expenses, dec!(30));
    assert_eq!(summary.net_savings, dec!(70));
}

#[test]
fn test_summary_keeps_decimal_precision() {
    let txns = vec![
        txn(dec!(0.10), "Food", "2024-01-01"),
        txn(dec!(0.20), "Food", "2024-01-01"),
    ];
    assert_eq!(summarize(&txns).total_expenses, dec!(0.30));
}

// ── Category breakdown ────────────────────────────────────────

#[test]
fn test_breakdown_scenario() {
    assert_eq!(
        category_breakdown(&scenario_txns()),
        vec![CategoryTotal {
            category: "Food".into(),
            total_amount: dec!(200),
        }]
    );
}

#[test]
fn test_breakdown_empty() {
    assert!(category_breakdown(&[]).is_empty());
}

#[test]
fn test_breakdown_only_income_is_empty() {
    let txns = vec![txn(dec!(10), "Income", "2024-01-01")];
    assert!(category_breakdown(&txns).is_empty());
}

#[test]
fn test_breakdown_sorted_descending_and_grouped() {
    let breakdown = category_breakdown(&mixed_txns());
    let pairs: Vec<(&str, Decimal)> = breakdown
        .iter()
        .map(|c| (c.category.as_str(), c.total_amount))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Housing", dec!(2400)),
            ("Food", dec!(125.75)),
            ("Utilities", dec!(60)),
            ("Transportation", dec!(35)),
            ("Entertainment", dec!(19.99)),
        ]
    );
}

#[test]
fn test_breakdown_ties_broken_by_name() {
    let txns = vec![
        txn(dec!(50), "Gifts", "2024-01-01"),
        txn(dec!(50), "Clothing", "2024-01-02"),
        txn(dec!(50), "Education", "2024-01-03"),
        txn(dec!(75), "Other", "2024-01-04"),
    ];
    let names: Vec<String> = category_breakdown(&txns)
        .into_iter()
        .map(|c| c.category)
        .collect();
    assert_eq!(names, vec!["Other", "Clothing", "Education", "Gifts"]);
}

#[test]
fn test_breakdown_tie_order_independent_of_input_order() {
    let mut txns = vec![
        txn(dec!(50), "Gifts", "2024-01-01"),
        txn(dec!(50), "Clothing", "2024-01-02"),
    ];
    let first = category_breakdown(&txns);
    txns.reverse();
    assert_eq!(category_breakdown(&txns), first);
}

#[test]
fn test_breakdown_total_matches_summary_expenses() {
    let txns = mixed_txns();
    let breakdown_total: Decimal = category_breakdown(&txns).iter().map(|c| c.total_amount).sum();
    assert_eq!(breakdown_total, summarize(&txns).total_expenses);
}

#[test]
fn test_breakdown_keeps_unrecognized_category_name() {
    let txns = vec![txn(dec!(9), "Pets", "2024-01-01")];
    let breakdown = category_breakdown(&txns);
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].category, "Pets");
}

#[test]
fn test_breakdown_share() {
    let entry = CategoryTotal {
        category: "Food".into(),
        total_amount: dec!(25),
    };
    assert_eq!(entry.share_of(dec!(100)), dec!(25));
    assert_eq!(entry.share_of(Decimal::ZERO), Decimal::ZERO);
}

// ── Monthly series ────────────────────────────────────────────

#[test]
fn test_monthly_empty_window_is_all_zero() {
    let series = monthly_series(&[], &config("2024-06", 6));
    let keys: Vec<String> = series.iter().map(|r| r.month_key.to_string()).collect();
    assert_eq!(
        keys,
        vec!["2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06"]
    );
    assert!(series
        .iter()
        .all(|r| r.income.is_zero() && r.expenses.is_zero()));
}

#[test]
fn test_monthly_labels() {
    let series = monthly_series(&[], &config("2024-02", 3));
    let labels: Vec<&str> = series.iter().map(|r| r.month_label.as_str()).collect();
    assert_eq!(labels, vec!["Dec", "Jan", "Feb"]);
}

#[test]
fn test_monthly_buckets_income_and_expenses() {
    let series = monthly_series(&mixed_txns(), &config("2024-02", 3));
    assert_eq!(series.len(), 3);

    assert_eq!(series[0].month_key, month("2023-12"));
    assert_eq!(series[0].income, Decimal::ZERO);
    assert_eq!(series[0].expenses, dec!(35));

    assert_eq!(series[1].month_key, month("2024-01"));
    assert_eq!(series[1].income, dec!(3000));
    assert_eq!(series[1].expenses, dec!(1245.50));

    assert_eq!(series[2].month_key, month("2024-02"));
    assert_eq!(series[2].income, dec!(250));
    assert_eq!(series[2].expenses, dec!(1360.24));
    assert_eq!(series[2].net(), dec!(-1110.24));
}

#[test]
fn test_monthly_ignores_transactions_outside_window() {
    let txns = vec![
        txn(dec!(10), "Food", "2023-06-30"),
        txn(dec!(20), "Food", "2024-07-01"),
        txn(dec!(5), "Food", "2024-06-15"),
    ];
    let series = monthly_series(&txns, &config("2024-06", 6));
    let total: Decimal = series.iter().map(|r| r.expenses).sum();
    assert_eq!(total, dec!(5));
}

#[test]
fn test_monthly_length_independent_of_input_size() {
    let many: Vec<Transaction> = (0..10_000)
        .map(|i| {
            let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(i % 2000);
            Transaction::new(dec!(1), day, "bulk".into(), "Food".into())
        })
        .collect();
    for window in [1, 6, 12, 24] {
        assert_eq!(monthly_series(&many, &config("2024-06", window)).len(), window);
        assert_eq!(monthly_series(&[], &config("2024-06", window)).len(), window);
    }
}

#[test]
fn test_monthly_zero_window_is_empty() {
    assert!(monthly_series(&scenario_txns(), &config("2024-03", 0)).is_empty());
}

#[test]
fn test_monthly_order_independent_of_transaction_order() {
    let mut txns = mixed_txns();
    let cfg = config("2024-02", 4);
    let first = monthly_series(&txns, &cfg);
    txns.reverse();
    assert_eq!(monthly_series(&txns, &cfg), first);
}

#[test]
fn test_monthly_default_window() {
    let cfg = AnalyticsConfig::new(month("2024-06"));
    assert_eq!(cfg.window_size, DEFAULT_WINDOW_SIZE);
    assert_eq!(monthly_series(&[], &cfg).len(), 6);
}

// ── Budget comparison ─────────────────────────────────────────

#[test]
fn test_compare_scenario() {
    let rows = compare_budget(&scenario_txns(), Some(&budget("2024-03", &[("Food", dec!(300))])));
    assert_eq!(
        rows,
        vec![BudgetComparison {
            category: "Food".into(),
            budgeted: dec!(300),
            actual: dec!(200),
            remaining: dec!(100),
        }]
    );
}

#[test]
fn test_compare_without_budget_is_empty() {
    assert!(compare_budget(&scenario_txns(), None).is_empty());
}

#[test]
fn test_compare_excludes_zero_limits_even_with_spending() {
    let txns = vec![
        txn(dec!(40), "Entertainment", "2024-03-10"),
        txn(dec!(200), "Food", "2024-03-05"),
    ];
    let b = budget("2024-03", &[("Food", dec!(300)), ("Entertainment", Decimal::ZERO)]);
    let rows = compare_budget(&txns, Some(&b));
    assert_eq!(rows.len(), 1);
    assert!(rows.iter().all(|r| r.category != "Entertainment"));
}

#[test]
fn test_compare_unbudgeted_spending_has_no_row() {
    let txns = vec![txn(dec!(500), "Housing", "2024-03-01")];
    let rows = compare_budget(&txns, Some(&budget("2024-03", &[("Food", dec!(300))])));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Food");
    assert_eq!(rows[0].actual, Decimal::ZERO);
    assert_eq!(rows[0].remaining, dec!(300));
}

#[test]
fn test_compare_only_counts_budget_month() {
    let txns = vec![
        txn(dec!(100), "Food", "2024-02-29"),
        txn(dec!(30), "Food", "2024-03-01"),
        txn(dec!(20), "Food", "2024-03-31"),
        txn(dec!(70), "Food", "2024-04-01"),
        txn(dec!(999), "Food", "2023-03-15"),
    ];
    let rows = compare_budget(&txns, Some(&budget("2024-03", &[("Food", dec!(300))])));
    assert_eq!(rows[0].actual, dec!(50));
}

#[test]
fn test_compare_ignores_income_in_budgeted_name() {
    // A limit keyed by "Income" never accrues actual spending
    let txns = vec![txn(dec!(5000), "Income", "2024-03-01")];
    let rows = compare_budget(&txns, Some(&budget("2024-03", &[("Income", dec!(100))])));
    assert_eq!(rows[0].actual, Decimal::ZERO);
}

#[test]
fn test_compare_overspend_clamps_remaining() {
    let txns = vec![
        txn(dec!(250), "Food", "2024-03-02"),
        txn(dec!(100), "Food", "2024-03-20"),
    ];
    let rows = compare_budget(&txns, Some(&budget("2024-03", &[("Food", dec!(300))])));
    let row = &rows[0];
    assert_eq!(row.actual, dec!(350));
    assert_eq!(row.remaining, Decimal::ZERO);
    assert!(row.is_over_budget());
    assert!(row.usage() > dec!(116) && row.usage() < dec!(117));
}

#[test]
fn test_compare_sorted_by_actual_then_name() {
    let txns = vec![
        txn(dec!(80), "Utilities", "2024-03-03"),
        txn(dec!(120), "Food", "2024-03-04"),
        txn(dec!(80), "Clothing", "2024-03-05"),
    ];
    let b = budget(
        "2024-03",
        &[
            ("Utilities", dec!(100)),
            ("Food", dec!(300)),
            ("Clothing", dec!(50)),
            ("Gifts", dec!(40)),
        ],
    );
    let names: Vec<String> = compare_budget(&txns, Some(&b))
        .into_iter()
        .map(|r| r.category)
        .collect();
    assert_eq!(names, vec!["Food", "Clothing", "Utilities", "Gifts"]);
}

#[test]
fn test_compare_remaining_never_negative_and_actual_exact() {
    let txns = mixed_txns();
    let b = budget(
        "2024-02",
        &[("Housing", dec!(1000)), ("Food", dec!(100)), ("Utilities", dec!(60))],
    );
    for row in compare_budget(&txns, Some(&b)) {
        assert!(row.remaining >= Decimal::ZERO);
        let expected: Decimal = txns
            .iter()
            .filter(|t| t.category == row.category && t.month() == month("2024-02"))
            .map(|t| t.amount)
            .sum();
        assert_eq!(row.actual, expected);
    }
}

#[test]
fn test_usage_without_limit_is_zero() {
    let row = BudgetComparison {
        category: "Food".into(),
        budgeted: Decimal::ZERO,
        actual: dec!(10),
        remaining: Decimal::ZERO,
    };
    assert_eq!(row.usage(), Decimal::ZERO);
}

#[test]
fn test_usage_saturates_for_tiny_limit() {
    let txns = vec![txn(dec!(1000000000), "Food", "2024-03-04")];
    let b = budget("2024-03", &[("Food", dec!(0.0000000000000000000000000001))]);
    let rows = compare_budget(&txns, Some(&b));
    assert!(rows[0].is_over_budget());
    assert_eq!(rows[0].usage(), Decimal::MAX);
}

#[test]
fn test_share_saturates_for_tiny_total() {
    let entry = CategoryTotal {
        category: "Food".into(),
        total_amount: dec!(1000000000),
    };
    assert_eq!(
        entry.share_of(dec!(0.0000000000000000000000000001)),
        Decimal::MAX
    );
}

// ── Overflow ──────────────────────────────────────────────────

#[test]
fn test_huge_amounts_saturate_instead_of_overflowing() {
    let txns = vec![
        txn(Decimal::MAX, "Food", "2024-03-01"),
        txn(Decimal::MAX, "Food", "2024-03-02"),
        txn(Decimal::MAX, "Income", "2024-03-03"),
        txn(Decimal::MAX, "Income", "2024-03-04"),
    ];

    let summary = summarize(&txns);
    assert_eq!(summary.total_income, Decimal::MAX);
    assert_eq!(summary.total_expenses, Decimal::MAX);
    assert_eq!(summary.net_savings, Decimal::ZERO);

    assert_eq!(category_breakdown(&txns)[0].total_amount, Decimal::MAX);

    let monthly = monthly_series(&txns, &config("2024-03", 1));
    assert_eq!(monthly[0].expenses, Decimal::MAX);
    assert_eq!(monthly[0].net(), Decimal::ZERO);

    let rows = compare_budget(&txns, Some(&budget("2024-03", &[("Food", dec!(300))])));
    assert_eq!(rows[0].actual, Decimal::MAX);
    assert_eq!(rows[0].remaining, Decimal::ZERO);
}

#[test]
fn test_net_saturates_when_only_expenses_are_huge() {
    let txns = vec![
        txn(Decimal::MAX, "Food", "2024-03-01"),
        txn(dec!(-5), "Income", "2024-03-02"),
    ];
    assert_eq!(summarize(&txns).net_savings, Decimal::MIN);
}

// ── Dashboard / idempotence ───────────────────────────────────

#[test]
fn test_dashboard_combines_views() {
    let txns = mixed_txns();
    let b = budget("2024-02", &[("Food", dec!(100))]);
    let cfg = config("2024-02", 6);
    let dash = Dashboard::build(&txns, Some(&b), &cfg);

    assert_eq!(dash.transaction_count, txns.len());
    assert_eq!(dash.summary, summarize(&txns));
    assert_eq!(dash.breakdown, category_breakdown(&txns));
    assert_eq!(dash.monthly, monthly_series(&txns, &cfg));
    assert_eq!(dash.budget, compare_budget(&txns, Some(&b)));
    assert_eq!(dash.recent.len(), 5);
}

#[test]
fn test_recent_transactions_newest_first() {
    let recent = recent_transactions(&mixed_txns(), 3);
    let dates: Vec<String> = recent.iter().map(|t| t.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-02-20", "2024-02-14", "2024-02-10"]);
    assert!(recent_transactions(&[], 5).is_empty());
}

#[test]
fn test_aggregation_is_idempotent() {
    let txns = mixed_txns();
    let b = budget("2024-02", &[("Food", dec!(100)), ("Housing", dec!(1500))]);
    let cfg = config("2024-02", 6);
    let first = serde_json::to_string(&Dashboard::build(&txns, Some(&b), &cfg)).unwrap();
    let second = serde_json::to_string(&Dashboard::build(&txns, Some(&b), &cfg)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_view_models_serialize_camel_case() {
    let json = serde_json::to_value(summarize(&scenario_txns())).unwrap();
    assert_eq!(json["totalIncome"], "1000");
    assert_eq!(json["netSavings"], "800");

    let series = monthly_series(&[], &config("2024-06", 1));
    let json = serde_json::to_value(&series).unwrap();
    assert_eq!(json[0]["monthKey"], "2024-06");
    assert_eq!(json[0]["monthLabel"], "Jun");
}
