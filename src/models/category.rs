use crate::models::transaction::TransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    /// Hex colour (`#rrggbb`) used when charting the category.
    pub color: &'static str,
}

const fn category(id: &'static str, name: &'static str, color: &'static str) -> Category {
    Category { id, name, color }
}

pub const INCOME_CATEGORIES: &[Category] = &[
    category("salary", "Salary", "#22c55e"),
    category("freelance", "Freelance", "#10b981"),
    category("investment", "Investment", "#14b8a6"),
    category("other-income", "Other", "#6ee7b7"),
];

pub const EXPENSE_CATEGORIES: &[Category] = &[
    category("food", "Food", "#f59e0b"),
    category("transport", "Transport", "#3b82f6"),
    category("shopping", "Shopping", "#ec4899"),
    category("bills", "Bills", "#ef4444"),
    category("entertainment", "Entertainment", "#8b5cf6"),
    category("health", "Health", "#10b981"),
    category("other-expense", "Other", "#6b7280"),
];

pub fn categories_for(transaction_type: TransactionType) -> &'static [Category] {
    match transaction_type {
        TransactionType::Income => INCOME_CATEGORIES,
        TransactionType::Expense => EXPENSE_CATEGORIES,
    }
}

/// Looks up `id` among the categories of `transaction_type`.
pub fn find_category(transaction_type: TransactionType, id: &str) -> Option<&'static Category> {
    categories_for(transaction_type).iter().find(|c| c.id == id)
}

/// The "Other" bucket that unknown category ids fall back to.
pub fn other_category(transaction_type: TransactionType) -> &'static Category {
    match transaction_type {
        TransactionType::Income => &INCOME_CATEGORIES[3],
        TransactionType::Expense => &EXPENSE_CATEGORIES[6],
    }
}

/// Like [find_category], but never fails: stored records may carry ids that
/// are no longer in the registry.
pub fn resolve_category(transaction_type: TransactionType, id: &str) -> &'static Category {
    find_category(transaction_type, id).unwrap_or_else(|| other_category(transaction_type))
}

/// Category ids are lowercase; user input is matched case-insensitively.
pub fn normalize_category_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn default_category(transaction_type: TransactionType) -> &'static Category {
    &categories_for(transaction_type)[0]
}

/// Chart colour for a display name, e.g. a category breakdown entry.
pub fn color_for_name(transaction_type: TransactionType, name: &str) -> &'static str {
    categories_for(transaction_type)
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| other_category(transaction_type))
        .color
}
