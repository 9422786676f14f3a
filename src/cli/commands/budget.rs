use crate::cli::context::{resolve_id, split_flags, usage, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::{BudgetAlert, BudgetService, BudgetStatus};
use crate::domain::{Category, Transaction, TransactionDraft, TransactionKind, ValidationError};
use crate::utils::format::{format_currency, format_date, format_percentage};

use super::print_rows;
use super::task::single;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "budget",
        "Track income and expenses",
        "budget income|expense <amount> <description> [--category C]\n\
         budget edit <row|id> income|expense <amount> <description> [--category C]\n\
         budget remove <row|id>\n\
         budget list | summary",
        cmd_budget,
    )]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return summary(context);
    };
    match action.to_ascii_lowercase().as_str() {
        "income" => add(context, TransactionKind::Income, rest),
        "expense" => add(context, TransactionKind::Expense, rest),
        "edit" => edit(context, rest),
        "remove" | "rm" | "delete" => remove(context, rest),
        "list" | "ls" => {
            output::section("Recent transactions");
            let currency = context.currency().to_string();
            print_rows(&context.organizer.budget, |txn| transaction_line(txn, &currency));
            Ok(())
        }
        "summary" => summary(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown budget action `{other}`"
        ))),
    }
}

/// `fallback` is the category kept when `--category` is omitted.
fn draft_from(
    kind: TransactionKind,
    args: &[&str],
    command: &str,
    fallback: Category,
) -> Result<TransactionDraft, CommandError> {
    let (positional, flags) = split_flags(args)?;
    let Some((amount, words)) = positional.split_first() else {
        return Err(usage(command));
    };
    let amount: f64 = amount
        .parse()
        .map_err(|_| ValidationError::NonPositiveAmount)?;
    let category = match flags.get("category") {
        Some(value) => value.parse()?,
        None => fallback,
    };
    let description = words.join(" ");
    Ok(match kind {
        TransactionKind::Income => TransactionDraft::income(description, amount, category),
        TransactionKind::Expense => TransactionDraft::expense(description, amount, category),
    })
}

fn add(context: &mut ShellContext, kind: TransactionKind, args: &[&str]) -> CommandResult {
    let draft = draft_from(
        kind,
        args,
        "budget income|expense <amount> <description>",
        Category::Other,
    )?;
    let (mutation, alert) = BudgetService::record(&mut context.organizer.budget, draft)?;
    let label = match kind {
        TransactionKind::Income => "Income recorded.",
        TransactionKind::Expense => "Expense recorded.",
    };
    context.report_mutation(label, &mutation);
    match alert {
        Some(BudgetAlert::NearLimit { percentage }) => output::warning(format!(
            "Budget alert: you have spent {:.0}% of your income.",
            percentage
        )),
        Some(BudgetAlert::OverBudget { percentage }) => output::warning(format!(
            "Over budget: expenses are {:.0}% of your income.",
            percentage
        )),
        None => {}
    }
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "budget edit <row|id> income|expense <amount> <description>";
    let [target, kind, rest @ ..] = args else {
        return Err(usage(USAGE));
    };
    let Some(id) = resolve_id(&context.organizer.budget, target)? else {
        return Ok(());
    };
    let kind: TransactionKind = kind.parse()?;
    let fallback = context
        .organizer
        .budget
        .get(&id)
        .map_or(Category::Other, |txn| txn.category);
    let draft = draft_from(kind, rest, USAGE, fallback)?;
    if let Some(mutation) = context.organizer.budget.update(&id, draft)? {
        context.report_mutation("Transaction updated.", &mutation);
    }
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(id) = resolve_id(&context.organizer.budget, single(args, "budget remove <row|id>")?)? else {
        return Ok(());
    };
    let mode = context.mode;
    let removal = context
        .organizer
        .budget
        .remove(&id, &|prompt: &str| io::confirm(mode, prompt));
    context.report_removal(removal, "transaction")
}

fn summary(context: &mut ShellContext) -> CommandResult {
    let summary = BudgetService::summary(&context.organizer.budget);
    let currency = context.currency();
    output::section("Budget summary");
    output::info(format!("  Income    : {}", format_currency(summary.income, currency)));
    output::info(format!("  Expenses  : {}", format_currency(summary.expenses, currency)));
    output::info(format!("  Balance   : {}", format_currency(summary.balance, currency)));
    let usage_line = format!("  Spent     : {:.1}% of income", summary.percentage);
    match summary.status {
        BudgetStatus::Healthy => output::info(usage_line),
        BudgetStatus::Caution => output::info(format!("{usage_line} (caution)")),
        BudgetStatus::Warning => output::warning(format!("{usage_line} (near limit)")),
        BudgetStatus::OverBudget => output::warning(format!("{usage_line} (over budget)")),
    }
    let ranked = BudgetService::top_categories(&summary);
    if !ranked.is_empty() {
        output::info("  Spending by category:");
        for (category, amount) in ranked {
            output::info(format!(
                "    {:<14}{} ({})",
                category.to_string(),
                format_currency(amount, currency),
                format_percentage(amount, summary.expenses)
            ));
        }
    }
    Ok(())
}

pub(crate) fn transaction_line(txn: &Transaction, currency: &str) -> String {
    format!(
        "{} {} [{}] {}",
        format_currency(txn.signed_amount(), currency),
        txn.description,
        txn.category,
        format_date(txn.created_at)
    )
}
