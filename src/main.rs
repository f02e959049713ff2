// Main entry point for confspec

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use confspec::cli::{CheckArgs, Cli, Commands, InspectArgs};
use confspec::config;
use confspec::reader::{ErrorCategory, ErrorPolicy, Reader};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.verbose {
        "confspec=debug,warn"
    } else {
        "confspec=warn,error"
    };

    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .event_format(confspec::logging::CustomFormatter)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    if cli.verbose {
        info!("Starting confspec v{}", env!("CARGO_PKG_VERSION"));
    }

    // Handle init_config flag
    if let Some(config_file) = &cli.init_config {
        let config = config::Config::default();
        std::fs::write(config_file, config.to_toml())?;
        println!("Configuration file created: {}", config_file.display());
        println!("\nYou can now edit the file to customize your settings.");
        return Ok(());
    }

    // Load settings from file (if exists)
    let config = match &cli.settings {
        Some(path) => {
            let loaded = config::Config::load_from_file(path);
            if loaded.is_none() {
                error!("Cannot load settings from {}", path.display());
                std::process::exit(1);
            }
            loaded
        }
        None => config::Config::load(),
    };

    match &cli.command {
        Some(Commands::Inspect(args)) => handle_inspect(&cli, config.as_ref(), args),
        Some(Commands::Check(args)) => handle_check(&cli, config.as_ref(), args),
        None => {
            // Implicit Inspect
            let args = cli.inspect_args.clone();
            if args.file.is_none() {
                warn!("No input file provided. Use 'confspec --help' for usage.");
                return Ok(());
            }
            handle_inspect(&cli, config.as_ref(), &args)
        }
    }
}

/// Reader without a schema: every keyword is collected as a plain string
fn tolerant_reader(cli: &Cli, config: Option<&config::Config>) -> Reader {
    let mut reader = Reader::new();
    if let Some(cfg) = config {
        cfg.apply(&mut reader);
    }
    if let Some(marker) = cli.comment_marker {
        reader.set_comment_marker(marker);
    }
    if let Some(marker) = cli.assignment_marker {
        reader.set_assignment_marker(marker);
    }
    if let Some(marker) = cli.continuation_marker {
        reader.set_continuation_marker(marker);
    }
    if cli.case_sensitive_keys {
        reader.set_keyword_case_sensitive(true);
    }
    reader.set_policy(ErrorCategory::UnexpectedKeyword, ErrorPolicy::Silent);
    reader
}

fn handle_inspect(cli: &Cli, config: Option<&config::Config>, args: &InspectArgs) -> Result<()> {
    let Some(file) = &args.file else {
        warn!("No input file provided. Use 'confspec --help' for usage.");
        return Ok(());
    };

    let reader = tolerant_reader(cli, config);
    let (content, diagnostics) = reader.parse_file_with_diagnostics(file)?;

    if args.is_json() {
        let report = serde_json::json!({
            "content": content,
            "diagnostics": diagnostics,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Entries in {}:", content.source());
    let mut keys: Vec<_> = content.keywords().collect();
    keys.sort_unstable();
    for key in &keys {
        if let Some(entry) = content.entry(key) {
            println!("  {} = {}", key, entry.value.render());
        }
    }
    println!(
        "\n{} line(s) read, {} entr{}, {} without `{}`",
        diagnostics.total_lines,
        keys.len(),
        if keys.len() == 1 { "y" } else { "ies" },
        diagnostics.missing_assignment,
        reader.assignment_marker(),
    );
    if diagnostics.unterminated_continuation {
        println!("note: source ends with an open line continuation");
    }

    Ok(())
}

fn handle_check(cli: &Cli, config: Option<&config::Config>, args: &CheckArgs) -> Result<()> {
    let reader = tolerant_reader(cli, config);
    let mut reports = Vec::new();
    let mut files_with_errors = 0;

    for file in &args.files {
        match reader.parse_file_with_diagnostics(file) {
            Ok((content, diagnostics)) => {
                let clean =
                    diagnostics.missing_assignment == 0 && !diagnostics.unterminated_continuation;
                if !args.is_json() {
                    if clean {
                        println!("{} ... OK ({} entries)", file.display(), content.len());
                    } else {
                        println!(
                            "{} ... {} line(s) without `{}`{}",
                            file.display(),
                            diagnostics.missing_assignment,
                            reader.assignment_marker(),
                            if diagnostics.unterminated_continuation {
                                ", open continuation at end of file"
                            } else {
                                ""
                            }
                        );
                    }
                }
                reports.push(serde_json::json!({
                    "file": file.display().to_string(),
                    "entries": content.len(),
                    "diagnostics": diagnostics,
                    "clean": clean,
                }));
            }
            Err(e) => {
                files_with_errors += 1;
                if !args.is_json() {
                    error!("{}", e);
                }
                reports.push(serde_json::json!({
                    "file": file.display().to_string(),
                    "error": e.to_string(),
                }));
            }
        }
    }

    if args.is_json() {
        let report = serde_json::json!({
            "files": reports,
            "summary": {
                "total_files": args.files.len(),
                "files_with_errors": files_with_errors,
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if files_with_errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
