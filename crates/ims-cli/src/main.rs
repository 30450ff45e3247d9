//! # ims CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ims_cli::catalog::{run_catalog, CatalogArgs};
use ims_cli::connection::ConnectionArgs;
use ims_cli::documents::{run_documents, DocumentsArgs};
use ims_cli::links::{run_links, LinksArgs};

/// Incubation platform CLI.
///
/// Creates documents filed under several categories at once, links the
/// copies, and inspects documents, links and the catalog.
#[derive(Parser, Debug)]
#[command(name = "ims", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create, list, show and delete documents.
    Documents(DocumentsArgs),

    /// Inspect document links.
    Links(LinksArgs),

    /// Show categories, subcategories and periodicities.
    Catalog(CatalogArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(api_url = %cli.connection.api_url, "ims CLI starting");

    let result = match &cli.command {
        Commands::Documents(args) => run_documents(args, &cli.connection).await,
        Commands::Links(args) => run_links(args, &cli.connection).await,
        Commands::Catalog(args) => run_catalog(args, &cli.connection).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(ims_cli::EXIT_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ims_cli::documents::DocumentsCommand;
    use ims_cli::links::LinksCommand;
    use ims_core::{CategoryId, DocumentId, SubcategoryId, UserId};
    use ims_linking::FallbackPolicy;

    #[test]
    fn cli_parse_documents_create() {
        let cli = Cli::try_parse_from([
            "ims",
            "--user-id",
            "7",
            "--incubator-id",
            "3",
            "documents",
            "create",
            "--name",
            "Audit Report",
            "--description",
            "Quarterly audit report for board review",
            "--category",
            "1",
            "--subcategory",
            "10",
            "--periodicity",
            "2",
            "--also",
            "2:21",
            "--also",
            "3",
            "--fallback",
            "require-explicit",
        ])
        .unwrap();

        assert_eq!(cli.connection.user_id, Some(UserId::new(7)));
        let Commands::Documents(args) = cli.command else {
            panic!("expected documents command");
        };
        let DocumentsCommand::Create(create) = args.command else {
            panic!("expected create");
        };
        assert_eq!(create.applicability, "mandatory");
        assert_eq!(create.also.len(), 2);
        assert_eq!(create.fallback, Some(FallbackPolicy::RequireExplicit));

        let submission = create.to_submission().unwrap();
        assert_eq!(
            submission.checked_categories().collect::<Vec<_>>(),
            vec![CategoryId::new(2), CategoryId::new(3)]
        );
        assert!(submission.is_subcategory_checked(SubcategoryId::new(21)));
    }

    #[test]
    fn cli_parse_rejects_zero_ids() {
        assert!(Cli::try_parse_from(["ims", "documents", "get", "0"]).is_err());
        assert!(Cli::try_parse_from(["ims", "--incubator-id", "x", "catalog"]).is_err());
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ims",
            "links",
            "list",
            "42",
            "-vv",
            "--api-url",
            "http://localhost:9000",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.connection.api_url.as_str(), "http://localhost:9000/");
        let Commands::Links(args) = cli.command else {
            panic!("expected links command");
        };
        let LinksCommand::List { document_id, json } = args.command;
        assert_eq!(document_id, DocumentId::new(42));
        assert!(!json);
    }

    #[test]
    fn cli_parse_catalog_json() {
        let cli = Cli::try_parse_from(["ims", "catalog", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Catalog(CatalogArgs { json: true })));
    }
}
