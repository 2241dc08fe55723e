//! Merge command - merge every open PR that passes the gate

use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, CROSS, Stylize};
use anstream::println;
use review_gate::actions::MergeOutcome;
use review_gate::run::{PrReport, RunSummary};

/// Options for the merge command
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Evaluate and report without merging, commenting, or notifying
    pub dry_run: bool,
    /// Skip pruning of old success notices
    pub no_cleanup: bool,
}

/// Run the merge command
///
/// Returns normally even when individual PRs fail; their failures are part of
/// the printed summary. An error before the loop starts is logged by the
/// caller.
pub async fn run_merge(ctx: &CommandContext, options: &MergeOptions) -> review_gate::Result<()> {
    let runner = ctx.runner(ctx.run_options(options.dry_run, !options.no_cleanup));
    let summary = runner.merge_pass().await?;

    for report in &summary.prs {
        print_pr(report);
    }
    print_summary(&summary, options.dry_run);
    Ok(())
}

fn print_pr(report: &PrReport) {
    println!(
        "{} {}",
        format!("#{}", report.number).accent(),
        report.title.emphasis()
    );

    if let Some(ref verdict) = report.verdict {
        if verdict.ready {
            println!("  {} ready", CHECK.success());
        } else {
            for reason in &verdict.blocking_reasons {
                println!("  {} {}", CROSS.warn(), reason.muted());
            }
        }
    }

    match report.merge {
        Some(MergeOutcome::Merged { ref sha }) => {
            let sha = sha.as_deref().unwrap_or("(no sha)");
            println!("  {} merged {}", CHECK.success(), sha.muted());
        }
        Some(MergeOutcome::Rejected { ref message }) => {
            println!("  {} could not merge: {}", CROSS.error(), message);
        }
        Some(MergeOutcome::Skipped) => println!("  {}", "would merge (dry run)".muted()),
        None => {}
    }

    if let Some(ref cleanup) = report.cleanup
        && !cleanup.deleted.is_empty()
    {
        println!(
            "  {}",
            format!("removed {} old notice(s)", cleanup.deleted.len()).muted()
        );
    }

    for failure in &report.failures {
        println!("  {} {}", "⚠️".warn(), failure.to_string().warn());
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    println!();
    let verb = if dry_run { "would merge" } else { "merged" };
    let merged = if dry_run {
        summary.ready_count()
    } else {
        summary.merged_count()
    };
    println!(
        "{} {} evaluated, {} ready, {} {}, {} failed",
        "Done:".emphasis(),
        summary.prs.len().accent(),
        summary.ready_count().accent(),
        merged.accent(),
        verb,
        summary.failed_count().accent()
    );
}
