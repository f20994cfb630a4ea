//! reflectgen CLI: generate reflection macro files for C++ headers.
//!
//! Calls `reflectgen-core` directly. Meant to run as a pre-build step over a
//! single header or a whole include tree.

use clap::Parser;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use reflectgen_core::generate::collect_headers;
use reflectgen_core::types::*;
use reflectgen_core::{generate_dir, generate_file, load_config_file, load_reflect_config, preview_file};

/// Generate `_generated.h` reflection companions for marked structs and enums.
#[derive(Parser)]
#[command(name = "reflectgen", version, about)]
struct Cli {
    /// Header file, or directory to walk recursively
    path: PathBuf,

    /// Config file (default: .reflectgen.toml next to the input)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print generated text to stdout instead of writing files
    #[arg(long)]
    dry_run: bool,

    /// Output as JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

fn fail(e: impl Display) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

fn resolve_config(cli: &Cli) -> ReflectConfig {
    if let Some(path) = &cli.config {
        return load_config_file(path).unwrap_or_else(|e| fail(e));
    }
    let dir = if cli.path.is_dir() {
        cli.path.as_path()
    } else {
        cli.path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
    };
    load_reflect_config(dir)
}

fn report(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Generated { output, .. } => println!("Generated {}", output.display()),
        FileOutcome::Skipped { input } => println!("Skipped {}", input.display()),
    }
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(e)));
}

fn dry_run(headers: &[PathBuf], config: &ReflectConfig, json: bool) {
    let mut items = Vec::new();
    for header in headers {
        let text = preview_file(header, config).unwrap_or_else(|e| fail(e));
        if json {
            items.push(serde_json::json!({
                "input": header.display().to_string(),
                "text": text,
            }));
            continue;
        }
        match text {
            Some(text) => {
                if headers.len() > 1 {
                    println!("==> {} <==", header.display());
                }
                print!("{text}");
            }
            None => eprintln!("Skipped {}", header.display()),
        }
    }
    if json {
        print_json(&serde_json::Value::Array(items));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reflectgen=warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli);
    let is_dir = cli.path.is_dir();

    if cli.dry_run {
        let headers = if is_dir {
            collect_headers(&cli.path, &config).unwrap_or_else(|e| fail(e))
        } else {
            vec![cli.path.clone()]
        };
        dry_run(&headers, &config, cli.json);
        return;
    }

    let outcomes = if is_dir {
        generate_dir(&cli.path, &config).unwrap_or_else(|e| fail(e)).outcomes
    } else {
        vec![generate_file(&cli.path, &config).unwrap_or_else(|e| fail(e))]
    };

    if cli.json {
        let items: Vec<serde_json::Value> = outcomes.iter().map(FileOutcome::to_json).collect();
        print_json(&serde_json::Value::Array(items));
    } else {
        for outcome in &outcomes {
            report(outcome);
        }
        if is_dir {
            let generated = outcomes.iter().filter(|o| matches!(o, FileOutcome::Generated { .. })).count();
            eprintln!("\n{} generated, {} skipped", generated, outcomes.len() - generated);
        }
    }
}
