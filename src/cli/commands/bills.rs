use crate::cli::commands::CommandDefinition;
use crate::cli::{context::AppContext, output, render, CommandResult};
use crate::core::services::{
    BalanceService, BillDraft, BillEdit, BillService, GroupingService, ServiceError,
};
use crate::domain::{Person, POT_BILL_ID};
use crate::errors::CliError;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "list",
            "Show bills grouped by type and month",
            "list [--all]",
            cmd_list,
        ),
        CommandDefinition::new(
            "summary",
            "Show the balance for the settlement month",
            "summary",
            cmd_summary,
        ),
        CommandDefinition::new(
            "toggle",
            "Mark a bill paid or unpaid for one person",
            "toggle <id> <ire|ebe>",
            cmd_toggle,
        ),
        CommandDefinition::new(
            "pay-pot",
            "Add a contribution to the credit card pot",
            "pay-pot <ire|ebe> <amount>",
            cmd_pay_pot,
        ),
        CommandDefinition::new(
            "edit",
            "Change a bill's name, amount, or due date",
            "edit <id> [--name <name>] [--amount <amount>] [--due <YYYY-MM-DD>]",
            cmd_edit,
        ),
        CommandDefinition::new(
            "add",
            "Add a custom bill",
            "add <name> <amount> <YYYY-MM-DD>",
            cmd_add,
        ),
        CommandDefinition::new("delete", "Delete a bill", "delete <id>", cmd_delete),
        CommandDefinition::new(
            "reset",
            "Clear the local cache and regenerate the schedule",
            "reset",
            cmd_reset,
        ),
    ]
}

fn usage_error(usage: &str) -> CliError {
    CliError::Input(format!("usage: {usage}"))
}

/// Reports rejected form values as a warning; other failures propagate.
fn warn_if_invalid<T>(result: Result<T, ServiceError>) -> Result<Option<T>, CliError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ServiceError::Invalid(reason)) => {
            output::warning(format!("No changes made: {reason}"));
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_list(context: &mut AppContext, args: &[&str]) -> CommandResult {
    let show_all = match args {
        [] => false,
        ["--all"] => true,
        _ => return Err(usage_error("list [--all]")),
    };

    let gateway = context.gateway();
    let today = gateway.today();
    let (bills, source) = if show_all {
        let outcome = gateway.list();
        (outcome.bills, outcome.source)
    } else {
        let active = BillService::load_active(gateway);
        (active.bills, active.source)
    };

    output::section(format!("Bills ({})", render::source_label(source)));
    if bills.is_empty() {
        output::info("No bills to show.");
        return Ok(());
    }
    for line in render::groups(&GroupingService::group(&bills, today)) {
        output::info(line);
    }
    Ok(())
}

fn cmd_summary(context: &mut AppContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage_error("summary"));
    }
    let gateway = context.gateway();
    let today = gateway.today();
    let active = BillService::load_active(gateway);
    let summary = BalanceService::summarize(&active.bills, today);
    let months = BalanceService::month_names(&active.bills);

    output::section("Balance");
    for line in render::summary(&summary, months.as_ref()) {
        output::info(line);
    }
    Ok(())
}

fn cmd_toggle(context: &mut AppContext, args: &[&str]) -> CommandResult {
    let [id, person] = args else {
        return Err(usage_error("toggle <id> <ire|ebe>"));
    };
    let person: Person = person.parse()?;
    let bill = BillService::toggle(context.gateway(), id, person)?;
    let state = if bill.paid(person) { "paid" } else { "unpaid" };
    output::success(format!("{} ({}) marked {state} for {person}", bill.name, bill.id));
    Ok(())
}

fn cmd_pay_pot(context: &mut AppContext, args: &[&str]) -> CommandResult {
    let [person, amount] = args else {
        return Err(usage_error("pay-pot <ire|ebe> <amount>"));
    };
    let person: Person = person.parse()?;
    let Ok(amount) = amount.trim().parse::<f64>() else {
        output::warning(format!("No changes made: `{amount}` is not a valid amount"));
        return Ok(());
    };
    if let Some(pot) = warn_if_invalid(BillService::contribute_to_pot(
        context.gateway(),
        person,
        amount,
    ))? {
        output::success(format!(
            "{person} has contributed {} of {} to {}",
            render::money(pot.paid_amount(person)),
            render::money(pot.share()),
            POT_BILL_ID
        ));
    }
    Ok(())
}

fn cmd_edit(context: &mut AppContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "edit <id> [--name <name>] [--amount <amount>] [--due <YYYY-MM-DD>]";
    let Some((id, mut rest)) = args.split_first() else {
        return Err(usage_error(USAGE));
    };

    let mut edit = BillEdit::default();
    while let [flag, value, tail @ ..] = rest {
        let slot = match *flag {
            "--name" => &mut edit.name,
            "--amount" => &mut edit.amount,
            "--due" => &mut edit.due_date,
            _ => return Err(usage_error(USAGE)),
        };
        *slot = Some((*value).to_string());
        rest = tail;
    }
    if !rest.is_empty() || edit.is_empty() {
        return Err(usage_error(USAGE));
    }

    if let Some(bill) = warn_if_invalid(BillService::edit(context.gateway(), id, &edit))? {
        output::success(format!(
            "Updated {}: {} {} due {}",
            bill.id,
            bill.name,
            render::money(bill.total_amount),
            bill.due_date
        ));
    }
    Ok(())
}

fn cmd_add(context: &mut AppContext, args: &[&str]) -> CommandResult {
    let [name, amount, due_date] = args else {
        return Err(usage_error("add <name> <amount> <YYYY-MM-DD>"));
    };
    let draft = BillDraft {
        name: (*name).to_string(),
        amount: (*amount).to_string(),
        due_date: (*due_date).to_string(),
    };
    if let Some(bill) = warn_if_invalid(BillService::add(context.gateway(), &draft))? {
        output::success(format!(
            "Added {} ({}) {} due {}",
            bill.name,
            bill.id,
            render::money(bill.total_amount),
            bill.due_date
        ));
    }
    Ok(())
}

fn cmd_delete(context: &mut AppContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage_error("delete <id>"));
    };
    BillService::remove(context.gateway(), id)?;
    output::success(format!("Deleted {id}"));
    Ok(())
}

fn cmd_reset(context: &mut AppContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage_error("reset"));
    }
    let gateway = context.gateway();
    gateway.reset_local()?;
    let bills = gateway.regenerate();
    output::success(format!(
        "Local cache cleared; schedule holds {} bills",
        bills.len()
    ));
    Ok(())
}
