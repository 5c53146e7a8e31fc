//! Plan command - print the ordered target sequence without running it

use super::{load_orchestrator, GlobalOptions};
use anyhow::{Context, Result};
use colored::*;

pub fn run(options: &GlobalOptions, action: &str, packages: &[String]) -> Result<()> {
    let orchestrator = load_orchestrator(options)?;
    let graph = orchestrator
        .plan(action, packages)
        .with_context(|| format!("Cannot plan {}", action))?;
    let order = graph.execution_order()?;

    if options.json {
        let targets: Vec<_> = order
            .iter()
            .map(|target| {
                serde_json::json!({
                    "target": target.id.to_string(),
                    "step": target.describe(),
                    "after": graph
                        .prerequisites_of(&target.id)
                        .iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&targets)?);
        return Ok(());
    }

    if options.no_color {
        colored::control::set_override(false);
    }
    if order.is_empty() {
        println!("Nothing to do for {}", action);
    }
    for (position, target) in order.iter().enumerate() {
        println!(
            "{:>3}. {}  {}",
            position + 1,
            target.id.to_string().bold(),
            target.describe().dimmed()
        );
    }
    Ok(())
}
