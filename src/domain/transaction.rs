//! Income and expense entries backing the budget tracker.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Amount with the sign applied for balance arithmetic.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub description: String,
    pub amount: f64,
    pub category: Category,
}

impl TransactionDraft {
    pub fn income(description: impl Into<String>, amount: f64, category: Category) -> Self {
        Self {
            kind: TransactionKind::Income,
            description: description.into(),
            amount,
            category,
        }
    }

    pub fn expense(description: impl Into<String>, amount: f64, category: Category) -> Self {
        Self {
            kind: TransactionKind::Expense,
            description: description.into(),
            amount,
            category,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Transaction {
    fn name(&self) -> &str {
        &self.description
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        let sign = match self.kind {
            TransactionKind::Income => '+',
            TransactionKind::Expense => '-',
        };
        format!("{}{:.2} {} [{}]", sign, self.amount, self.description, self.category)
    }
}

impl Record for Transaction {
    type Draft = TransactionDraft;

    const ID_PREFIX: &'static str = "transaction";
    const STORAGE_KEY: &'static str = "student_organizer_budget";
    const PLURAL: &'static str = "transactions";
    const LIST_LIMIT: Option<usize> = Some(10);

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(draft: &TransactionDraft) -> Result<(), ValidationError> {
        require_text("description", &draft.description)?;
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(())
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: TransactionDraft) -> Self {
        Self {
            id,
            kind: draft.kind,
            description: draft.description.trim().to_string(),
            amount: draft.amount,
            category: draft.category,
            created_at,
        }
    }

    fn apply(&mut self, draft: TransactionDraft) {
        self.kind = draft.kind;
        self.description = draft.description.trim().to_string();
        self.amount = draft.amount;
        self.category = draft.category;
    }

    fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            kind: self.kind,
            description: self.description.clone(),
            amount: self.amount,
            category: self.category,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        })
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(TransactionKind::Income),
            "expense" | "out" => Ok(TransactionKind::Expense),
            other => Err(ValidationError::UnknownValue {
                field: "transaction type",
                value: other.to_string(),
            }),
        }
    }
}

/// Spending categories; unrecognised stored values fall back to `Other`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Education,
    Food,
    Transport,
    Housing,
    Entertainment,
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Education,
        Category::Food,
        Category::Transport,
        Category::Housing,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Education => "education",
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Housing => "housing",
            Category::Entertainment => "entertainment",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
            .ok_or(ValidationError::UnknownValue {
                field: "category",
                value: normalized,
            })
    }
}

/// Totals derived from the transaction list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetStats {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub transaction_count: usize,
    /// Expense totals per category.
    pub by_category: BTreeMap<Category, f64>,
}

impl BudgetStats {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut stats = BudgetStats {
            transaction_count: transactions.len(),
            ..BudgetStats::default()
        };
        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => stats.income += txn.amount,
                TransactionKind::Expense => {
                    stats.expenses += txn.amount;
                    *stats.by_category.entry(txn.category).or_default() += txn.amount;
                }
            }
        }
        stats.balance = stats.income - stats.expenses;
        stats
    }

    /// Share of income already spent, in percent. Zero when there is no income.
    pub fn percentage(&self) -> f64 {
        if self.income > 0.0 {
            self.expenses / self.income * 100.0
        } else {
            0.0
        }
    }
}
