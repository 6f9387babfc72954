//! # Patio CLI
//!
//! Terminal front end for patio_core.
//!
//! ```text
//! patio_cli [SPEC.json] [--optimize] [--json]
//! ```
//!
//! Loads a specification (the default patio when no path is given),
//! generates it and prints the components, the bill of materials and any
//! code violations. `--optimize` runs the cost search first and prints the
//! winning specification as JSON; `--json` prints it without searching.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (e.g. `RUST_LOG=patio_core=debug`).

use std::process::ExitCode;

use patio_core::units::format_feet_inches;
use patio_core::{CalcError, Patio, Specification};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

struct Args {
    spec_path: Option<String>,
    optimize: bool,
    json: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        spec_path: None,
        optimize: false,
        json: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--optimize" => args.optimize = true,
            "--json" => args.json = true,
            _ => args.spec_path = Some(arg),
        }
    }
    args
}

fn load_spec(path: Option<&str>) -> Result<Specification, CalcError> {
    match path {
        None => Ok(Specification::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| CalcError::invalid_input("spec_path", path, e.to_string()))?;
            Ok(serde_json::from_str(&text)?)
        }
    }
}

fn print_patio(patio: &Patio) {
    let convention = patio.spec().display().size_convention;

    println!("═══════════════════════════════════════");
    println!("  COMPONENTS");
    println!("═══════════════════════════════════════");
    for group in patio.groups() {
        let label = group.nominal_size_label(convention).unwrap_or_else(|_| "-".to_string());
        println!("  {:<12} {:>3} x {}", group.name(), group.len(), label);
    }

    println!();
    println!("═══════════════════════════════════════");
    println!("  BILL OF MATERIALS");
    println!("═══════════════════════════════════════");
    let bill = patio.bill();
    for (label, lengths) in bill.quantities() {
        for (length, count) in lengths {
            println!("  {:<6} {:>10}  x{}", label, format_feet_inches(length.inches()), count);
        }
        println!("  {:<6} subtotal ${:.2}", label, bill.subtotals().get(label).copied().unwrap_or(0.0));
    }
    println!("  TOTAL  ${:.2}", bill.total());

    println!();
    println!("═══════════════════════════════════════");
    if patio.violations().is_empty() {
        println!("  RESULT: PASS");
    } else {
        println!("  RESULT: FAIL");
        for violation in patio.violations() {
            println!("  [FAIL] {}", violation);
        }
    }
    println!("═══════════════════════════════════════");
}

fn run(args: &Args) -> Result<(), CalcError> {
    let spec = load_spec(args.spec_path.as_deref())?;
    let mut patio = Patio::new(spec)?;
    info!(total = patio.bill().total(), "patio generated");

    if args.optimize {
        if patio.generate_optimal_patio()? {
            println!("Cheapest compliant configuration applied.");
        } else {
            println!("No compliant configuration found; restored the last valid design.");
        }
        println!();
    }

    print_patio(&patio);

    if args.json || args.optimize {
        println!();
        println!("{}", serde_json::to_string_pretty(patio.spec())?);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), "{}", e);
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
