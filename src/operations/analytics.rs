//! Read models derived from the transaction list.
//!
//! Everything here is recomputed from scratch whenever a view needs it; the
//! lists involved hold hundreds of records, not millions.

use crate::models::category::resolve_category;
use crate::models::transaction::{Transaction, TransactionType};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Number of calendar months shown in the monthly overview.
pub const MONTHS_IN_SERIES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceState {
    Positive,
    Negative,
}

impl Totals {
    pub fn balance_state(&self) -> BalanceState {
        if self.balance >= Decimal::ZERO {
            BalanceState::Positive
        } else {
            BalanceState::Negative
        }
    }
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let (income, expenses) = transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expenses), t| match t.transaction_type {
            TransactionType::Income => (income + t.amount, expenses),
            TransactionType::Expense => (income, expenses + t.amount),
        },
    );

    Totals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Spending for one category display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub name: String,
    pub value: Decimal,
}

/// Sums expenses per category name, in the order the names first appear.
///
/// Ids that are not in the registry count towards "Other".
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut breakdown: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
    {
        let name = resolve_category(TransactionType::Expense, &transaction.category).name;
        match breakdown.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.value += transaction.amount,
            None => breakdown.push(CategoryTotal {
                name: name.to_string(),
                value: transaction.amount,
            }),
        }
    }

    breakdown
}

/// Income and expenses of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTotals {
    pub year: i32,
    pub month: u32,
    /// Three-letter month name, e.g. "Jan".
    pub label: String,
    pub income: Decimal,
    pub expenses: Decimal,
}

/// Totals for the month containing `today` and the five months before it,
/// oldest first.
///
/// Months are matched on both year and month, so transactions from an earlier
/// year never land in this year's bucket of the same name.
pub fn monthly_series(transactions: &[Transaction], today: NaiveDate) -> Vec<MonthlyTotals> {
    let mut series: Vec<MonthlyTotals> = series_months(today)
        .into_iter()
        .map(|month_start| MonthlyTotals {
            year: month_start.year(),
            month: month_start.month(),
            label: month_label(month_start),
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
        })
        .collect();

    for transaction in transactions {
        let bucket = series.iter_mut().find(|bucket| {
            bucket.year == transaction.date.year() && bucket.month == transaction.date.month()
        });
        if let Some(bucket) = bucket {
            match transaction.transaction_type {
                TransactionType::Income => bucket.income += transaction.amount,
                TransactionType::Expense => bucket.expenses += transaction.amount,
            }
        }
    }

    series
}

/// One point of the running balance line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancePoint {
    pub label: String,
    pub balance: Decimal,
}

/// The balance at the end of each month of [monthly_series], counting every
/// transaction dated on or before that month's last day.
pub fn running_balance(transactions: &[Transaction], today: NaiveDate) -> Vec<BalancePoint> {
    series_months(today)
        .into_iter()
        .map(|month_start| {
            let next_month = month_start + Months::new(1);
            let balance = transactions
                .iter()
                .filter(|t| t.date < next_month)
                .fold(Decimal::ZERO, |acc, t| match t.transaction_type {
                    TransactionType::Income => acc + t.amount,
                    TransactionType::Expense => acc - t.amount,
                });
            BalancePoint {
                label: month_label(month_start),
                balance,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TransactionFilter {
    pub fn matches(self, transaction: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Income => transaction.transaction_type == TransactionType::Income,
            TransactionFilter::Expense => transaction.transaction_type == TransactionType::Expense,
        }
    }

    /// All → Expense → Income → All, the order the dashboard cycles through.
    pub fn next(self) -> Self {
        match self {
            TransactionFilter::All => TransactionFilter::Expense,
            TransactionFilter::Expense => TransactionFilter::Income,
            TransactionFilter::Income => TransactionFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionFilter::All => "all",
            TransactionFilter::Income => "income",
            TransactionFilter::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransactionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(TransactionFilter::All),
            "income" => Ok(TransactionFilter::Income),
            "expense" => Ok(TransactionFilter::Expense),
            other => Err(format!(
                "Invalid filter '{}'. Use 'all', 'income' or 'expense'.",
                other
            )),
        }
    }
}

/// The transactions matching `filter`, newest date first.
///
/// Transactions on the same date keep their relative order.
pub fn filtered_view(transactions: &[Transaction], filter: TransactionFilter) -> Vec<&Transaction> {
    let mut view: Vec<&Transaction> = transactions.iter().filter(|t| filter.matches(t)).collect();
    view.sort_by(|a, b| b.date.cmp(&a.date));
    view
}

fn series_months(today: NaiveDate) -> Vec<NaiveDate> {
    let current = today.with_day(1).unwrap_or(today);
    (0..MONTHS_IN_SERIES as u32)
        .rev()
        .map(|back| current - Months::new(back))
        .collect()
}

fn month_label(date: NaiveDate) -> String {
    date.format("%b").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("Invalid date")
    }

    fn create_test_transaction(
        id: &str,
        transaction_type: TransactionType,
        amount: i64,
        category: &str,
        date: NaiveDate,
    ) -> Transaction {
        Transaction::new(
            id.to_string(),
            date,
            format!("Transaction {}", id),
            Decimal::new(amount, 0),
            transaction_type,
            category.to_string(),
        )
    }

    fn scenario_a() -> Vec<Transaction> {
        vec![
            create_test_transaction(
                "1",
                TransactionType::Income,
                1000,
                "salary",
                date(2024, 1, 15),
            ),
            create_test_transaction("2", TransactionType::Expense, 200, "food", date(2024, 1, 16)),
        ]
    }

    #[test]
    fn test_totals_scenario_a() {
        let totals = totals(&scenario_a());
        assert_eq!(totals.income, Decimal::new(1000, 0));
        assert_eq!(totals.expenses, Decimal::new(200, 0));
        assert_eq!(totals.balance, Decimal::new(800, 0));
        assert_eq!(totals.balance_state(), BalanceState::Positive);
    }

    #[test]
    fn test_category_breakdown_scenario_a() {
        assert_eq!(
            category_breakdown(&scenario_a()),
            vec![CategoryTotal {
                name: "Food".to_string(),
                value: Decimal::new(200, 0)
            }]
        );
    }

    #[test]
    fn test_empty_collection() {
        let today = date(2024, 3, 10);
        let totals = totals(&[]);
        assert_eq!(totals.income, Decimal::ZERO);
        assert_eq!(totals.expenses, Decimal::ZERO);
        assert_eq!(totals.balance, Decimal::ZERO);
        assert!(category_breakdown(&[]).is_empty());

        let series = monthly_series(&[], today);
        assert_eq!(series.len(), MONTHS_IN_SERIES);
        assert!(
            series
                .iter()
                .all(|m| m.income == Decimal::ZERO && m.expenses == Decimal::ZERO)
        );
    }

    #[test]
    fn test_negative_balance() {
        let transactions = vec![
            create_test_transaction("1", TransactionType::Income, 50, "salary", date(2024, 1, 1)),
            create_test_transaction("2", TransactionType::Expense, 80, "bills", date(2024, 1, 2)),
        ];
        let totals = totals(&transactions);
        assert_eq!(totals.balance, Decimal::new(-30, 0));
        assert_eq!(totals.income - totals.expenses, totals.balance);
        assert_eq!(totals.balance_state(), BalanceState::Negative);
    }

    #[test]
    fn test_category_breakdown_first_encountered_order_and_other() {
        let d = date(2024, 2, 1);
        let transactions = vec![
            create_test_transaction("1", TransactionType::Expense, 10, "transport", d),
            create_test_transaction("2", TransactionType::Income, 999, "salary", d),
            create_test_transaction("3", TransactionType::Expense, 5, "legacy-snacks", d),
            create_test_transaction("4", TransactionType::Expense, 7, "transport", d),
            create_test_transaction("5", TransactionType::Expense, 3, "other-expense", d),
        ];

        let breakdown = category_breakdown(&transactions);
        assert_eq!(
            breakdown,
            vec![
                CategoryTotal {
                    name: "Transport".to_string(),
                    value: Decimal::new(17, 0)
                },
                CategoryTotal {
                    name: "Other".to_string(),
                    value: Decimal::new(8, 0)
                },
            ]
        );
    }

    #[test]
    fn test_monthly_series_labels_oldest_first() {
        let series = monthly_series(&[], date(2024, 3, 31));
        let labels: Vec<&str> = series.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
        assert_eq!((series[0].year, series[0].month), (2023, 10));
        assert_eq!((series[5].year, series[5].month), (2024, 3));
    }

    #[test]
    fn test_monthly_series_sums_by_type() {
        let transactions = vec![
            create_test_transaction("1", TransactionType::Income, 1000, "salary", date(2024, 2, 1)),
            create_test_transaction("2", TransactionType::Expense, 40, "food", date(2024, 2, 28)),
            create_test_transaction("3", TransactionType::Expense, 60, "food", date(2024, 3, 2)),
            create_test_transaction("4", TransactionType::Expense, 99, "food", date(2023, 9, 30)),
        ];

        let series = monthly_series(&transactions, date(2024, 3, 15));
        let feb = &series[4];
        assert_eq!(feb.label, "Feb");
        assert_eq!(feb.income, Decimal::new(1000, 0));
        assert_eq!(feb.expenses, Decimal::new(40, 0));
        assert_eq!(series[5].expenses, Decimal::new(60, 0));

        let total_expenses: Decimal = series.iter().map(|m| m.expenses).sum();
        assert_eq!(total_expenses, Decimal::new(100, 0));
    }

    #[test]
    fn test_monthly_series_does_not_fold_previous_year() {
        let transactions = vec![
            create_test_transaction("1", TransactionType::Expense, 25, "food", date(2023, 3, 5)),
            create_test_transaction("2", TransactionType::Expense, 10, "food", date(2024, 3, 5)),
        ];

        let series = monthly_series(&transactions, date(2024, 3, 20));
        assert_eq!(series[5].label, "Mar");
        assert_eq!(series[5].expenses, Decimal::new(10, 0));
    }

    #[test]
    fn test_analytics_are_idempotent() {
        let transactions = scenario_a();
        let today = date(2024, 1, 31);

        assert_eq!(totals(&transactions), totals(&transactions));
        assert_eq!(category_breakdown(&transactions), category_breakdown(&transactions));
        assert_eq!(
            monthly_series(&transactions, today),
            monthly_series(&transactions, today)
        );
    }

    #[test]
    fn test_running_balance() {
        let transactions = vec![
            create_test_transaction("1", TransactionType::Income, 500, "salary", date(2023, 6, 1)),
            create_test_transaction("2", TransactionType::Expense, 100, "bills", date(2024, 1, 10)),
            create_test_transaction(
                "3",
                TransactionType::Income,
                300,
                "freelance",
                date(2024, 3, 1),
            ),
        ];

        let points = running_balance(&transactions, date(2024, 3, 1));
        let balances: Vec<Decimal> = points.iter().map(|p| p.balance).collect();
        assert_eq!(
            balances,
            vec![
                Decimal::new(500, 0),
                Decimal::new(500, 0),
                Decimal::new(500, 0),
                Decimal::new(400, 0),
                Decimal::new(400, 0),
                Decimal::new(700, 0),
            ]
        );
        assert_eq!(points[5].label, "Mar");
    }

    #[test]
    fn test_filtered_view_expense_sorted_descending() {
        let transactions = vec![
            create_test_transaction("1", TransactionType::Expense, 1, "food", date(2024, 1, 2)),
            create_test_transaction("2", TransactionType::Income, 2, "salary", date(2024, 1, 9)),
            create_test_transaction("3", TransactionType::Expense, 3, "food", date(2024, 1, 5)),
            create_test_transaction("4", TransactionType::Expense, 4, "bills", date(2024, 1, 1)),
        ];

        let view = filtered_view(&transactions, TransactionFilter::Expense);
        let ids: Vec<&str> = view.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "4"]);
    }

    #[test]
    fn test_filtered_view_ties_keep_input_order() {
        let d = date(2024, 5, 5);
        let transactions = vec![
            create_test_transaction("b", TransactionType::Expense, 1, "food", d),
            create_test_transaction("a", TransactionType::Income, 2, "salary", d),
            create_test_transaction("c", TransactionType::Expense, 3, "food", d),
        ];

        let view = filtered_view(&transactions, TransactionFilter::All);
        let ids: Vec<&str> = view.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_filter_parse_and_cycle() {
        assert_eq!("Income".parse::<TransactionFilter>(), Ok(TransactionFilter::Income));
        assert_eq!("".parse::<TransactionFilter>(), Ok(TransactionFilter::All));
        assert!("transfers".parse::<TransactionFilter>().is_err());

        let mut filter = TransactionFilter::All;
        for _ in 0..3 {
            filter = filter.next();
        }
        assert_eq!(filter, TransactionFilter::All);
    }
}
