//! Plain text renderings of the budget read models for the command shell.

use crate::models::category::resolve_category;
use crate::models::goal::Goal;
use crate::models::habit::Habit;
use crate::models::transaction::{Transaction, TransactionType};
use crate::operations::analytics::{
    BalancePoint, BalanceState, CategoryTotal, MonthlyTotals, Totals,
};
use rust_decimal::Decimal;

/// Formats `amount` as US dollars, e.g. `-$1,234.50`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

/// Amount with the sign the transaction list shows: `+` for income.
pub fn signed_amount(transaction: &Transaction) -> String {
    let sign = match transaction.transaction_type {
        TransactionType::Income => '+',
        TransactionType::Expense => '-',
    };
    format!("{}{}", sign, format_currency(transaction.amount))
}

pub fn totals_report(totals: &Totals) -> String {
    let state = match totals.balance_state() {
        BalanceState::Positive => "positive",
        BalanceState::Negative => "negative",
    };
    format!(
        "Income:   {}\nExpenses: {}\nBalance:  {} ({})",
        format_currency(totals.income),
        format_currency(totals.expenses),
        format_currency(totals.balance),
        state
    )
}

pub fn category_report(breakdown: &[CategoryTotal]) -> String {
    if breakdown.is_empty() {
        return "No expense data yet".to_string();
    }
    breakdown
        .iter()
        .map(|entry| format!("{:15} {:>14}", entry.name, format_currency(entry.value)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn monthly_report(series: &[MonthlyTotals]) -> String {
    if !series
        .iter()
        .any(|m| m.income > Decimal::ZERO || m.expenses > Decimal::ZERO)
    {
        return "No monthly data yet".to_string();
    }
    let mut lines = vec![format!("{:8} {:>14} {:>14}", "Month", "Income", "Expenses")];
    lines.extend(series.iter().map(|m| {
        format!(
            "{:8} {:>14} {:>14}",
            format!("{} {}", m.label, m.year),
            format_currency(m.income),
            format_currency(m.expenses)
        )
    }));
    lines.join("\n")
}

/// Running balance at the end of each month, oldest first.
pub fn balance_report(points: &[BalancePoint]) -> String {
    points
        .iter()
        .map(|point| format!("{:8} {:>14}", point.label, format_currency(point.balance)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn transaction_line(transaction: &Transaction) -> String {
    let category = resolve_category(transaction.transaction_type, &transaction.category);
    format!(
        "{}  {:12} {:28} {:>14}  [{}]",
        transaction.date.format("%b %-d, %Y"),
        category.name,
        transaction.description,
        signed_amount(transaction),
        transaction.id
    )
}

pub fn habit_line(habit: &Habit) -> String {
    format!(
        "[{}] {} - {} day streak  [{}]",
        if habit.completed { "x" } else { " " },
        habit.name,
        habit.streak,
        habit.id
    )
}

pub fn goal_line(goal: &Goal) -> String {
    let deadline = goal
        .target_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "No deadline".to_string());
    format!(
        "[{}] {} - {}/{} ({}%), target: {}  [{}]",
        if goal.completed { "x" } else { " " },
        goal.name,
        goal.current,
        goal.target,
        goal.progress_percent(),
        deadline,
        goal.id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(format_currency(Decimal::new(35, 1)), "$3.50");
        assert_eq!(format_currency(Decimal::new(123456789, 2)), "$1,234,567.89");
        assert_eq!(format_currency(Decimal::new(-30, 0)), "-$30.00");
        assert_eq!(format_currency(Decimal::new(100000, 0)), "$100,000.00");
    }

    #[test]
    fn test_totals_report() {
        let totals = Totals {
            income: Decimal::new(1000, 0),
            expenses: Decimal::new(200, 0),
            balance: Decimal::new(800, 0),
        };
        let report = totals_report(&totals);
        assert!(report.contains("Balance:  $800.00 (positive)"));
    }

    #[test]
    fn test_empty_reports() {
        assert_eq!(category_report(&[]), "No expense data yet");
        assert_eq!(monthly_report(&[]), "No monthly data yet");
    }

    #[test]
    fn test_balance_report() {
        let points = vec![
            BalancePoint {
                label: "Jan".to_string(),
                balance: Decimal::new(100, 0),
            },
            BalancePoint {
                label: "Feb".to_string(),
                balance: Decimal::new(-25, 0),
            },
        ];
        let report = balance_report(&points);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Jan"));
        assert!(lines[0].ends_with("$100.00"));
        assert!(lines[1].ends_with("-$25.00"));
    }

    #[test]
    fn test_transaction_line_uses_other_for_unknown_category() {
        let transaction = Transaction::new(
            "abc".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "Old record".to_string(),
            Decimal::new(5, 0),
            TransactionType::Expense,
            "gadgets".to_string(),
        );
        let line = transaction_line(&transaction);
        assert!(line.starts_with("Jan 5, 2024"));
        assert!(line.contains("Other"));
        assert!(line.contains("-$5.00"));
    }
}
