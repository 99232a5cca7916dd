use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;

use vargloss::validator::ValidationOutcome;
use vargloss::{BufferSurface, Document, Overlay, ParsedError, PassReport, ValidationRunner};

mod cli;
use cli::{Cli, Commands};

fn start_dir_for(input_path: &Path) -> PathBuf {
    input_path.parent().unwrap_or(Path::new(".")).to_path_buf()
}

/// Run one pass over one document, async when suggestions are requested.
#[cfg(feature = "suggest")]
fn run_pass(
    cfg: &vargloss::Config,
    document: &Path,
    schema: Option<&Path>,
    text: &str,
    suggest: bool,
) -> io::Result<PassReport> {
    use vargloss::suggest::HttpSuggestionProvider;

    let mut overlay = Overlay::new(BufferSurface::new(text));
    let runner = ValidationRunner::new(cfg);

    if suggest {
        let provider = HttpSuggestionProvider::new(cfg.suggestions.clone())
            .map_err(|e| io::Error::other(format!("cannot enable suggestions: {e}")))?;
        let runner = runner.with_suggester(Box::new(provider));
        // Suggestions go over HTTP, so this pass needs a runtime
        let rt = tokio::runtime::Runtime::new()?;
        return Ok(rt.block_on(async { runner.run(document, schema, text, &mut overlay).await }));
    }

    Ok(runner.run_sync(document, schema, text, &mut overlay))
}

#[cfg(not(feature = "suggest"))]
fn run_pass(
    cfg: &vargloss::Config,
    document: &Path,
    schema: Option<&Path>,
    text: &str,
    suggest: bool,
) -> io::Result<PassReport> {
    if suggest {
        eprintln!("Error: this build of vargloss does not include suggestion support");
        std::process::exit(2);
    }

    let mut overlay = Overlay::new(BufferSurface::new(text));
    Ok(ValidationRunner::new(cfg).run_sync(document, schema, text, &mut overlay))
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            files,
            schema,
            suggest,
            no_style,
        } => {
            let mut total = 0;

            for file in &files {
                let start_dir = start_dir_for(file);
                let (mut cfg, cfg_path) = vargloss::config::load(cli.config.as_deref(), &start_dir)?;

                if let Some(path) = &cfg_path {
                    log::debug!("Using config from: {}", path.display());
                } else {
                    log::debug!("Using default config");
                }

                if no_style {
                    cfg.linters.clear();
                }

                let schema_path =
                    vargloss::config::find_schema(schema.as_deref(), &cfg, cfg_path.as_deref(), file);
                let text = fs::read_to_string(file)?;

                #[cfg(feature = "suggest")]
                let suggest = suggest || cfg.suggestions.enabled;

                let report = run_pass(&cfg, file, schema_path.as_deref(), &text, suggest)?;
                print_report(file, &report);
                total += report.annotations.len();
            }

            if total > 0 {
                println!("\nFound {} issue(s)", total);
                std::process::exit(1);
            }

            println!("No issues found");
            Ok(())
        }
        Commands::Resolve { file, error } => {
            let text = fs::read_to_string(&file)?;
            let parsed = ParsedError::parse(&error);
            let doc = Document::new(&text);
            let line = vargloss::resolver::resolve_error(&parsed, &doc);

            println!("path:    {}", parsed.path);
            println!("missing: {}", parsed.missing);
            if parsed.missing && !parsed.is_document_level() {
                println!("target:  {} (parent of missing field)", parsed.resolution_path());
            }
            println!("anchor:  {}:{}", file.display(), line);
            if let Some(anchored) = doc.line(line) {
                println!("line:    {}", anchored);
            }
            Ok(())
        }
        #[cfg(feature = "lsp")]
        Commands::Lsp => {
            // LSP needs tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async { vargloss::lsp::run().await })?;
            Ok(())
        }
        #[cfg(not(feature = "lsp"))]
        Commands::Lsp => {
            eprintln!("Error: this build of vargloss does not include the LSP server");
            std::process::exit(2);
        }
    }
}

fn print_report(file: &Path, report: &PassReport) {
    let file_name = file.display();

    for (name, err) in &report.tool_failures {
        eprintln!("\x1b[33mwarning\x1b[0m: {name}: {err}"); // yellow
    }

    match &report.outcome {
        ValidationOutcome::Success { message } => {
            println!("\x1b[32mok\x1b[0m: {file_name}: {message}"); // green
        }
        ValidationOutcome::SchemaFailure { errors, .. } => {
            log::debug!("{} schema error(s) in {}", errors.len(), file_name);
        }
        ValidationOutcome::ToolError { .. } => {} // already on stderr
    }

    for ann in &report.annotations {
        println!(
            "\x1b[31merror\x1b[0m: {} at {}:{}", // red
            ann.text, file_name, ann.line
        );
    }
}
