use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use synergy_core::{AdviceEngine, Assessment, Reveal};

mod cli;
mod render;
mod script;
mod telemetry;

use cli::{Cli, Commands};
use script::SessionScript;

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    let assessment = Arc::new(load_assessment(cli.config.as_deref())?);
    run(&cli, assessment)
}

fn load_assessment(path: Option<&Path>) -> Result<Assessment> {
    match path {
        Some(path) => Assessment::from_file(path)
            .with_context(|| format!("failed to load assessment {}", path.display())),
        None => Assessment::builtin().context("built-in assessment is invalid"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: &Cli, assessment: Arc<Assessment>) -> Result<()> {
    match &cli.command {
        Commands::Categories => {
            if cli.json {
                print_json(&assessment.categories())
            } else {
                print!("{}", render::categories(&assessment));
                Ok(())
            }
        }
        Commands::Validate => {
            if cli.json {
                print_json(&serde_json::json!({
                    "valid": true,
                    "name": assessment.name(),
                    "categories": assessment.categories().len(),
                    "attributes": assessment.attribute_count(),
                }))
            } else {
                println!(
                    "OK: {} ({} categories, {} attributes)",
                    assessment.name(),
                    assessment.categories().len(),
                    assessment.attribute_count()
                );
                Ok(())
            }
        }
        Commands::Advice { category, p1, p2 } => {
            let engine = AdviceEngine::new(Arc::clone(&assessment));
            let result = engine.advice_for(category, *p1, *p2)?;
            if cli.json {
                print_json(&result)
            } else {
                print!("{}", render::advice(category, &result, assessment.partners()));
                Ok(())
            }
        }
        Commands::Report { session } => {
            let script = SessionScript::from_file(session)?;
            let state = script
                .apply(Arc::clone(&assessment))
                .with_context(|| format!("failed to replay session {}", session.display()))?;
            let reveal = state.results()?;

            if cli.json {
                return print_json(&reveal);
            }
            match &reveal {
                Reveal::Ready { report } => {
                    print!("{}", render::report(report, assessment.partners()))
                }
                Reveal::Waiting { message, .. } => println!("{}", message),
            }
            Ok(())
        }
    }
}
