//! Packages command - list the workspace packages in registry order

use super::{load_orchestrator, GlobalOptions};
use anyhow::Result;

pub fn run(options: &GlobalOptions) -> Result<()> {
    let orchestrator = load_orchestrator(options)?;
    let registry = orchestrator.registry();

    if options.json {
        let packages: Vec<_> = registry
            .packages()
            .iter()
            .map(|package| {
                serde_json::json!({
                    "name": package.name(),
                    "dir": registry.working_dir(package).display().to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&packages)?);
        return Ok(());
    }

    for package in registry.packages() {
        if options.verbose {
            println!("{}\t{}", package, registry.working_dir(package).display());
        } else {
            println!("{}", package);
        }
    }
    Ok(())
}
