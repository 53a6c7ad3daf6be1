//! Check command: run the pipeline and summarize

use serde_json::json;

use crate::output::{count, seconds, to_json, OutputFormat};
use crate::{AppContext, Cli};
use trackplan_loader::RunOutcome;

pub async fn run(cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::debug!("Checking definitions in {:?}", ctx.config.definitions_dir);

    let outcome = ctx.run().await?;
    let stats = *outcome.stats();

    match (&outcome, cli.output_format()) {
        (RunOutcome::Success(report), OutputFormat::Json) => {
            let summary = json!({
                "valid": true,
                "files": stats.files,
                "events": stats.events,
                "parameters": stats.parameters,
                "nodes": report.graph.node_count(),
                "edges": report.graph.edge_count(),
                "elapsed_ms": stats.elapsed.as_millis() as u64,
                "warnings": report.warnings,
            });
            println!("{}", to_json(&summary));
        }
        (RunOutcome::Success(report), OutputFormat::Table) => {
            if !cli.quiet {
                println!("Parsed in {}:", seconds(stats.elapsed));
                println!("  - {}", count(stats.files, "definition file"));
                println!("  - {}", count(stats.events, "event"));
                println!("  - {}", count(stats.parameters, "parameter"));
                println!(
                    "  - {} ({})",
                    count(report.graph.edge_count(), "reference"),
                    count(report.graph.node_count(), "node")
                );
                for warning in &report.warnings {
                    println!("warning: {}", warning);
                }
            }
        }
        (RunOutcome::Failure(report), OutputFormat::Json) => {
            let errors: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
            let summary = json!({
                "valid": false,
                "files": stats.files,
                "events": stats.events,
                "parameters": stats.parameters,
                "errors": errors,
            });
            println!("{}", to_json(&summary));
        }
        (RunOutcome::Failure(report), OutputFormat::Table) => {
            for error in &report.errors {
                eprintln!("{}", error);
            }
        }
    }

    if !outcome.is_success() {
        anyhow::bail!(
            "Validation failed with {}",
            count(outcome.errors().len(), "error")
        );
    }
    Ok(())
}
