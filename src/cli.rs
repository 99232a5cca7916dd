use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vargloss")]
#[command(author, version)]
#[command(about = "A validator and annotator for structured vars files")]
#[command(
    long_about = "Vargloss drives a schema validator and style linters over structured vars \
    files (YAML host/group variables and similar) and anchors every finding to the document \
    line it belongs to, even when the file is mid-edit and structurally broken. It ships a \
    CLI for one-shot checks and an LSP server that keeps annotations live while you type."
)]
#[command(after_help = "\
EXAMPLES:

    # Validate a vars file against a sibling schema.yml
    vargloss check vars/sw1.yml

    # Validate against an explicit schema
    vargloss check --schema schemas/net.yml vars/sw1.yml

    # Reword errors through the configured model
    vargloss check --suggest vars/sw1.yml

    # See which line one raw validator error resolves to
    vargloss resolve vars/sw1.yml --error 'devices.1.type: Required field missing'

CONFIGURATION:

Vargloss looks for configuration files in this order:
  1. Explicit --config path
  2. vargloss.toml or .vargloss.toml in current/parent directories
  3. ~/.config/vargloss/config.toml (XDG)
  4. Built-in defaults (yamale, yamllint, ansible-lint)

Example .vargloss.toml:

    schema = \"schemas/net.yml\"

    [validator]
    cmd = \"yamale\"
    args = [\"-s\"]

    [[linters]]
    name = \"yamllint\"
    cmd = \"yamllint\"
    args = [\"-f\", \"parsable\"]
    format = \"line-col\"")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    #[arg(help = "Path to configuration file")]
    #[arg(
        long_help = "Path to a custom configuration file. If not specified, vargloss will \
        search for .vargloss.toml or vargloss.toml in the document's directory and its \
        parents, then fall back to ~/.config/vargloss/config.toml."
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate vars files and print annotations per line
    #[command(
        long_about = "Run the schema validator and style linters over one or more vars files \
        and print every annotation with the line it anchors to. Schema errors are resolved \
        heuristically through their key paths; style findings use the line numbers the \
        linters report. Exits 1 when any annotation was produced."
    )]
    #[command(after_help = "\
EXAMPLES:

    # Check one file, schema discovered next to it
    vargloss check vars/sw1.yml

    # Check a directory's worth of files against one schema
    vargloss check --schema schemas/net.yml vars/*.yml

    # Schema only, skip the style linters
    vargloss check --no-style vars/sw1.yml

SCHEMA DISCOVERY:

  1. Explicit --schema path
  2. `schema` key in the loaded config
  3. schema.yml or schema.yaml next to the document

A file with no discoverable schema still gets its style pass; the missing
schema is reported as a tool warning.")]
    Check {
        /// Files to validate
        #[arg(required = true)]
        #[arg(help = "Vars files to validate")]
        files: Vec<PathBuf>,

        /// Schema to validate against
        #[arg(long)]
        #[arg(help = "Schema file (overrides config and sibling discovery)")]
        schema: Option<PathBuf>,

        /// Reword schema errors through the configured model
        #[arg(long)]
        #[arg(help = "Replace raw schema errors with model-written suggestions")]
        #[arg(
            long_help = "Ask the configured suggestion model to reword each schema error \
            into a short actionable fix. Requires the API key environment variable from the \
            [suggestions] config table. On any suggestion failure the raw error text is \
            used instead; validation results never depend on the model."
        )]
        suggest: bool,

        /// Skip the style linters
        #[arg(long)]
        #[arg(help = "Run only the schema validator")]
        no_style: bool,
    },
    /// Resolve one raw validator error line for debugging
    #[command(
        long_about = "Parse a raw `<key-path>: <message>` error line, classify it, and walk \
        its key path through the file exactly as a validation pass would, printing the line \
        the annotation would anchor to. Useful for understanding or reporting resolution \
        behavior."
    )]
    #[command(after_help = "\
EXAMPLES:

    # A missing field anchors to its parent list item
    vargloss resolve vars/sw1.yml --error 'devices.1.type: Required field missing'

    # A document-level error anchors to line 1
    vargloss resolve vars/sw1.yml --error 'hostname: Required field missing'")]
    Resolve {
        /// File to resolve against
        #[arg(help = "Vars file to resolve against")]
        file: PathBuf,

        /// Raw error line from a validator report
        #[arg(long)]
        #[arg(help = "Raw `<key-path>: <message>` error line")]
        error: String,
    },
    /// Start the Language Server Protocol server
    #[command(
        long_about = "Start the vargloss Language Server Protocol (LSP) server for editor \
        integration. The server revalidates on open and on change and publishes each \
        annotation as an end-of-line diagnostic."
    )]
    #[command(after_help = "\
The LSP server communicates via stdin/stdout and is typically launched automatically by your \
editor's LSP client. You generally don't need to run this command manually.")]
    Lsp,
}
