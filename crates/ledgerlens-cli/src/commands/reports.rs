//! Report command implementations

use anyhow::Result;
use ledgerlens_core::models::{CategoryAnalysis, SpendingAnalysis, SpendingSummary, TimeWindow};
use ledgerlens_core::{Database, LedgerService, WindowQuery, WindowSpec};

use super::truncate;
use crate::cli::WindowArgs;

/// Turn window flags into a spec through the same parser the API uses
pub fn window_spec(args: &WindowArgs) -> Result<WindowSpec> {
    let query = WindowQuery {
        days: args.days.map(|n| n.to_string()),
        weeks: args.weeks.map(|n| n.to_string()),
        months: args.months.map(|n| n.to_string()),
        years: args.years.map(|n| n.to_string()),
        period: args.period.clone(),
        start_date: args.from.clone(),
        end_date: args.to.clone(),
    };
    Ok(query.parse()?)
}

fn print_period(title: &str, period: &TimeWindow) {
    println!();
    println!("{} ({} to {})", title, period.start_date, period.end_date);
    println!("   ─────────────────────────────");
}

fn print_json(value: serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub fn cmd_report_summary(
    service: &LedgerService<Database>,
    owner: &str,
    window: &WindowArgs,
    json: bool,
) -> Result<SpendingSummary> {
    let summary = service.spending_summary(owner, &window_spec(window)?)?;

    if json {
        print_json(serde_json::to_value(&summary)?)?;
        return Ok(summary);
    }

    print_period("💰 Spending Summary", &summary.period);
    println!("   Income:       ${:>10.2}", summary.totals.total_income);
    println!("   Expenses:     ${:>10.2}", summary.totals.total_expenses);
    println!("   Net:          ${:>10.2}", summary.totals.net);
    println!("   Transactions: {:>11}", summary.totals.count);

    Ok(summary)
}

pub fn cmd_report_spending(
    service: &LedgerService<Database>,
    owner: &str,
    window: &WindowArgs,
    json: bool,
) -> Result<SpendingAnalysis> {
    let analysis = service.spending_analysis(owner, &window_spec(window)?)?;

    if json {
        print_json(serde_json::to_value(&analysis)?)?;
        return Ok(analysis);
    }

    print_period("📊 Spending Analysis", &analysis.period);
    println!(
        "   Income ${:.2} │ Expenses ${:.2} │ Net ${:.2} │ {} transactions",
        analysis.summary.total_income,
        analysis.summary.total_expenses,
        analysis.summary.net,
        analysis.summary.count
    );

    if analysis.top_categories.is_empty() {
        println!();
        println!("   No expenses in this window.");
    } else {
        println!();
        println!("   Top categories:");
        for cat in &analysis.top_categories {
            println!(
                "   {:<20} ${:>10.2}  {:>5.1}%  ({} txns)",
                truncate(&cat.category, 20),
                cat.total,
                cat.percentage,
                cat.count
            );
        }
    }

    if !analysis.daily_trend.is_empty() {
        println!();
        println!("   Daily trend:");
        for point in &analysis.daily_trend {
            println!(
                "   {} │ out ${:>9.2} │ in ${:>9.2}",
                point.date, point.expenses, point.income
            );
        }
    }

    Ok(analysis)
}

pub fn cmd_report_categories(
    service: &LedgerService<Database>,
    owner: &str,
    window: &WindowArgs,
    category: Option<&str>,
    json: bool,
) -> Result<CategoryAnalysis> {
    let analysis = service.category_analysis(owner, &window_spec(window)?, category)?;

    if json {
        print_json(serde_json::to_value(&analysis)?)?;
        return Ok(analysis);
    }

    print_period("🏷️  Category Analysis", &analysis.period);
    if let Some(filter) = &analysis.filtered_by {
        println!("   Filtered by: {}", filter);
    }
    println!(
        "   Total expenses: ${:.2} across {} categories",
        analysis.total_expenses, analysis.category_count
    );
    println!();

    for cat in &analysis.categories {
        println!(
            "   {:<20} ${:>10.2}  {:>5.1}%  {} txns, avg ${:.2}",
            truncate(&cat.category, 20),
            cat.total,
            cat.percentage,
            cat.count,
            cat.average_per_transaction
        );
    }

    Ok(analysis)
}
