//! Van solar designer entry point: CLI wiring and report output.

use std::path::Path;
use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use van_solar_designer::catalog::{Catalog, DemoCatalog, JsonCatalog};
use van_solar_designer::config::DesignConfig;
use van_solar_designer::design::DesignReport;
use van_solar_designer::io::export::export_csv;

/// Parsed CLI arguments.
struct CliArgs {
    design_path: Option<String>,
    preset: Option<String>,
    catalog_path: Option<String>,
    report_out: Option<String>,
}

fn print_help() {
    eprintln!("van-solar-designer - Electrical sizing for campervan solar systems");
    eprintln!();
    eprintln!("Usage: van-solar-designer [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --design <path>       Load design from TOML file");
    eprintln!("  --preset <name>       Use a built-in design (weekender, full_time)");
    eprintln!("  --catalog <path>      Load component catalog from JSON file");
    eprintln!("  --report-out <path>   Export per-string results to CSV");
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("If no --design or --preset is given, the weekender preset is used.");
    eprintln!("Without --catalog the built-in demo catalog is used.");
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostic output on stderr.");
}

fn next_value(args: &[String], i: &mut usize, flag: &str, what: &str) -> String {
    *i += 1;
    match args.get(*i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires a {what} argument");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        design_path: None,
        preset: None,
        catalog_path: None,
        report_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--design" => cli.design_path = Some(next_value(&args, &mut i, "--design", "path")),
            "--preset" => cli.preset = Some(next_value(&args, &mut i, "--preset", "name")),
            "--catalog" => cli.catalog_path = Some(next_value(&args, &mut i, "--catalog", "path")),
            "--report-out" => {
                cli.report_out = Some(next_value(&args, &mut i, "--report-out", "path"));
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.design_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --design and --preset cannot be used together");
        process::exit(1);
    }

    cli
}

fn load_design(cli: &CliArgs) -> DesignConfig {
    let loaded = match (&cli.design_path, &cli.preset) {
        (Some(path), _) => DesignConfig::from_toml_file(Path::new(path)),
        (None, Some(name)) => DesignConfig::from_preset(name),
        (None, None) => DesignConfig::from_preset("weekender"),
    };
    match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn load_catalog(path: Option<&str>) -> Catalog {
    match path {
        Some(path) => match JsonCatalog::from_path(Path::new(path)) {
            Ok(source) => Catalog::fetch(&source),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        },
        None => Catalog::fetch(&DemoCatalog),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // Load design: --design takes priority, then --preset, then weekender
    let design = load_design(&cli);

    // Validate
    let errors = design.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let catalog = load_catalog(cli.catalog_path.as_deref());
    info!(
        panels = catalog.panels.items().len(),
        mppts = catalog.mppts.items().len(),
        inverters = catalog.inverters.items().len(),
        "catalog loaded"
    );

    let session = match design.build_session() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    info!(
        panels = session.panels().len(),
        strings = session.strings().len(),
        appliances = session.appliances().len(),
        "design loaded"
    );

    let report = DesignReport::build(&session, &catalog);
    println!("{report}");

    if let Some(ref path) = cli.report_out {
        if let Err(e) = export_csv(&report, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("String results written to {path}");
    }
}
