//! Check command - print the verdict for one PR

use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, CROSS, Stylize};
use anstream::println;

/// Run the check command (no side effects)
pub async fn run_check(ctx: &CommandContext, pr_number: u64) -> review_gate::Result<()> {
    let runner = ctx.runner(ctx.run_options(true, false));
    let verdict = runner.check(pr_number).await?;

    let flag = |on: bool| if on { CHECK.success() } else { CROSS.warn() };

    println!("{} PR #{}", "Verdict for".emphasis(), pr_number.accent());
    println!("  {} approved", flag(verdict.approved));
    println!("  {} no pending review requests", flag(!verdict.pending_review_request));
    println!("  {} CI passed", flag(verdict.ci_passed));
    println!("  {} same-repository author", flag(!verdict.outside_contributor));
    println!("  {} no blocker labels", flag(!verdict.blocker_label_present));
    println!();
    if verdict.ready {
        println!("{}", "Ready to merge".success());
    } else {
        println!("{}", "Not ready:".warn());
        for reason in &verdict.blocking_reasons {
            println!("  - {}", reason.muted());
        }
    }
    Ok(())
}
