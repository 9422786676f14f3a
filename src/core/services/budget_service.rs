//! Budget totals, spending status and threshold alerts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::errors::Result;
use crate::core::manager::{Mutation, RecordManager};
use crate::domain::{BudgetStats, Category, Transaction, TransactionDraft};

pub const CAUTION_PERCENT: f64 = 70.0;
pub const WARNING_PERCENT: f64 = 90.0;
pub const OVER_BUDGET_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    Healthy,
    Caution,
    Warning,
    OverBudget,
}

impl BudgetStatus {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= OVER_BUDGET_PERCENT {
            BudgetStatus::OverBudget
        } else if percentage >= WARNING_PERCENT {
            BudgetStatus::Warning
        } else if percentage >= CAUTION_PERCENT {
            BudgetStatus::Caution
        } else {
            BudgetStatus::Healthy
        }
    }
}

/// Notification raised when spending crosses a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetAlert {
    NearLimit { percentage: f64 },
    OverBudget { percentage: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub percentage: f64,
    pub status: BudgetStatus,
    pub transaction_count: usize,
    pub by_category: BTreeMap<Category, f64>,
}

impl From<BudgetStats> for BudgetSummary {
    fn from(stats: BudgetStats) -> Self {
        let percentage = stats.percentage();
        Self {
            income: stats.income,
            expenses: stats.expenses,
            balance: stats.balance,
            percentage,
            status: BudgetStatus::for_percentage(percentage),
            transaction_count: stats.transaction_count,
            by_category: stats.by_category,
        }
    }
}

pub struct BudgetService;

impl BudgetService {
    pub fn stats(budget: &RecordManager<Transaction>) -> BudgetStats {
        BudgetStats::from_transactions(budget.all())
    }

    pub fn summary(budget: &RecordManager<Transaction>) -> BudgetSummary {
        Self::stats(budget).into()
    }

    /// Adds a transaction and reports any threshold it pushed spending across.
    pub fn record(
        budget: &mut RecordManager<Transaction>,
        draft: TransactionDraft,
    ) -> Result<(Mutation, Option<BudgetAlert>)> {
        let before = Self::summary(budget);
        let mutation = budget.add(draft)?;
        let after = Self::summary(budget);
        Ok((mutation, Self::threshold_alert(&before, &after)))
    }

    pub fn threshold_alert(before: &BudgetSummary, after: &BudgetSummary) -> Option<BudgetAlert> {
        let crossed = |limit: f64| before.percentage < limit && after.percentage >= limit;
        if crossed(OVER_BUDGET_PERCENT) {
            Some(BudgetAlert::OverBudget {
                percentage: after.percentage,
            })
        } else if crossed(WARNING_PERCENT) {
            Some(BudgetAlert::NearLimit {
                percentage: after.percentage,
            })
        } else {
            None
        }
    }

    /// Expense categories ordered by amount spent, largest first.
    pub fn top_categories(summary: &BudgetSummary) -> Vec<(Category, f64)> {
        let mut ranked: Vec<(Category, f64)> =
            summary.by_category.iter().map(|(c, v)| (*c, *v)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(income: f64, expenses: f64) -> BudgetSummary {
        BudgetStats {
            income,
            expenses,
            balance: income - expenses,
            ..BudgetStats::default()
        }
        .into()
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(BudgetStatus::for_percentage(0.0), BudgetStatus::Healthy);
        assert_eq!(BudgetStatus::for_percentage(70.0), BudgetStatus::Caution);
        assert_eq!(BudgetStatus::for_percentage(89.9), BudgetStatus::Caution);
        assert_eq!(BudgetStatus::for_percentage(90.0), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::for_percentage(100.0), BudgetStatus::OverBudget);
    }

    #[test]
    fn alerts_fire_only_on_crossing() {
        let calm = summary(1000.0, 500.0);
        let near = summary(1000.0, 950.0);
        let over = summary(1000.0, 1200.0);
        assert!(matches!(
            BudgetService::threshold_alert(&calm, &near),
            Some(BudgetAlert::NearLimit { .. })
        ));
        assert!(matches!(
            BudgetService::threshold_alert(&near, &over),
            Some(BudgetAlert::OverBudget { .. })
        ));
        assert!(matches!(
            BudgetService::threshold_alert(&calm, &over),
            Some(BudgetAlert::OverBudget { .. })
        ));
        assert_eq!(BudgetService::threshold_alert(&over, &over), None);
        assert_eq!(BudgetService::threshold_alert(&calm, &calm), None);
    }

    #[test]
    fn no_income_means_zero_percent() {
        let summary = summary(0.0, 300.0);
        assert_eq!(summary.percentage, 0.0);
        assert_eq!(summary.status, BudgetStatus::Healthy);
        assert_eq!(summary.balance, -300.0);
    }
}
