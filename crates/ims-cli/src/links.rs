//! # Links Subcommand
//!
//! - `ims links list <document-id>` — subcategories a document is
//!   additionally filed under.

use anyhow::Result;
use clap::{Args, Subcommand};
use ims_core::DocumentId;

use crate::connection::ConnectionArgs;
use crate::EXIT_OK;

/// Arguments for the `ims links` subcommand.
#[derive(Args, Debug)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub command: LinksCommand,
}

/// Links subcommands.
#[derive(Subcommand, Debug)]
pub enum LinksCommand {
    /// List the link edges of one document.
    List {
        /// Source document id.
        document_id: DocumentId,

        /// Print JSON instead of one line per link.
        #[arg(long)]
        json: bool,
    },
}

/// Execute the links subcommand.
pub async fn run_links(args: &LinksArgs, conn: &ConnectionArgs) -> Result<u8> {
    match &args.command {
        LinksCommand::List { document_id, json } => {
            let links = conn.client()?.links().list(*document_id).await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&links)?);
            } else if links.is_empty() {
                println!("document {document_id} has no links");
            } else {
                for link in &links {
                    println!(
                        "  document {} -> subcategory {}",
                        link.document_id, link.subcategory_id
                    );
                }
            }
            Ok(EXIT_OK)
        }
    }
}
