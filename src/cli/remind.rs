//! Remind command - nudge reviewers whose review is still requested

use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, Stylize};
use anstream::println;

/// Options for the remind command
#[derive(Debug, Clone, Default)]
pub struct RemindOptions {
    /// Report without posting or deleting comments
    pub dry_run: bool,
    /// Skip expiry of old reminders
    pub no_cleanup: bool,
}

/// Run the remind command
pub async fn run_remind(ctx: &CommandContext, options: &RemindOptions) -> review_gate::Result<()> {
    let runner = ctx.runner(ctx.run_options(options.dry_run, !options.no_cleanup));
    let summary = runner.remind_pass().await?;

    for report in &summary.prs {
        let Some(ref reminders) = report.reminders else {
            for failure in &report.failures {
                println!(
                    "{} {}",
                    format!("#{}", report.number).accent(),
                    failure.to_string().warn()
                );
            }
            continue;
        };

        println!(
            "{} {}",
            format!("#{}", report.number).accent(),
            report.title.emphasis()
        );
        for reviewer in &reminders.posted {
            println!("  {} reminded @{}", CHECK.success(), reviewer);
        }
        for reviewer in &reminders.skipped {
            println!("  {}", format!("@{reviewer} already reminded").muted());
        }
        for failure in &report.failures {
            println!("  {} {}", "⚠️".warn(), failure.to_string().warn());
        }
    }

    println!();
    println!(
        "{} {} reminder(s) {}, {} expired comment(s) removed, {} failed",
        "Done:".emphasis(),
        summary.reminders_posted().accent(),
        if options.dry_run { "planned" } else { "posted" },
        summary.comments_deleted().accent(),
        summary.failed_count().accent()
    );
    Ok(())
}
