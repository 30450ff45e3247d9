//! # Documents Subcommand
//!
//! - `ims documents create` — validate, create one row per target, resolve
//!   ids, link the rows pairwise and print the summary.
//! - `ims documents list [--category <id>] [--subcategory <id>]`
//! - `ims documents get <id>`
//! - `ims documents delete <id>`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use ims_client::DocumentFilter;
use ims_core::{
    Attachment, CategoryId, DocumentId, DocumentRecord, PeriodicityId, SubcategoryId,
    ValidationError,
};
use ims_linking::{
    DocumentLinker, DocumentSubmission, FallbackPolicy, IdentifierStrategy, LinkingConfig,
    LinkingError, LinkingReport, SummaryStatus,
};

use crate::connection::ConnectionArgs;
use crate::{EXIT_FAILURE, EXIT_INVALID, EXIT_OK, EXIT_PARTIAL};

/// Arguments for the `ims documents` subcommand.
#[derive(Args, Debug)]
pub struct DocumentsArgs {
    #[command(subcommand)]
    pub command: DocumentsCommand,
}

/// Documents subcommands.
#[derive(Subcommand, Debug)]
pub enum DocumentsCommand {
    /// Create a document under one or more locations and link the copies.
    Create(CreateArgs),

    /// List documents of the incubator.
    List {
        /// Only rows filed under this category.
        #[arg(long)]
        category: Option<CategoryId>,

        /// Only rows filed under this subcategory.
        #[arg(long)]
        subcategory: Option<SubcategoryId>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show one document row.
    Get {
        /// Document id.
        id: DocumentId,
    },

    /// Delete one document row.
    Delete {
        /// Document id.
        id: DocumentId,
    },
}

/// An additional filing location: `CATEGORY` or `CATEGORY:SUBCATEGORY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub category: CategoryId,
    pub subcategory: Option<SubcategoryId>,
}

impl FromStr for Selection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTarget(s.to_string());
        match s.split_once(':') {
            Some((cat, sub)) => Ok(Self {
                category: cat.parse().map_err(|_| invalid())?,
                subcategory: Some(sub.parse().map_err(|_| invalid())?),
            }),
            None => Ok(Self {
                category: s.parse().map_err(|_| invalid())?,
                subcategory: None,
            }),
        }
    }
}

/// Arguments for `ims documents create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Document name (3 to 100 characters).
    #[arg(long)]
    pub name: String,

    /// Description (10 to 500 characters).
    #[arg(long)]
    pub description: String,

    /// Primary category.
    #[arg(long)]
    pub category: CategoryId,

    /// Primary subcategory; must belong to --category.
    #[arg(long)]
    pub subcategory: SubcategoryId,

    /// Submission periodicity.
    #[arg(long)]
    pub periodicity: PeriodicityId,

    /// `mandatory` or `selective`.
    #[arg(long, default_value = "mandatory")]
    pub applicability: String,

    /// Which startups a selective document applies to.
    #[arg(long, default_value = "")]
    pub applicability_note: String,

    /// http(s) reference link.
    #[arg(long, default_value = "")]
    pub reference_link: String,

    /// Internal remarks.
    #[arg(long, default_value = "")]
    pub remarks: String,

    /// Sample/template file to attach.
    #[arg(long)]
    pub sample: Option<PathBuf>,

    /// Also file under CATEGORY[:SUBCATEGORY]. Repeatable. Without a
    /// subcategory, the fallback policy decides.
    #[arg(long = "also", value_name = "CATEGORY[:SUBCATEGORY]")]
    pub also: Vec<Selection>,

    /// Override IMS_LINK_FALLBACK (`first-subcategory` | `require-explicit`).
    #[arg(long)]
    pub fallback: Option<FallbackPolicy>,

    /// Override IMS_LINK_ID_STRATEGY (`list-lookup` | `prefer-response`).
    #[arg(long)]
    pub id_strategy: Option<IdentifierStrategy>,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

impl CreateArgs {
    /// Build the form submission, reading the sample file if one is given.
    pub fn to_submission(&self) -> Result<DocumentSubmission> {
        let mut submission = DocumentSubmission {
            name: self.name.clone(),
            description: self.description.clone(),
            category_id: Some(self.category),
            subcategory_id: Some(self.subcategory),
            periodicity_id: Some(self.periodicity),
            applicability: self.applicability.clone(),
            reference_link: self.reference_link.clone(),
            applicability_note: self.applicability_note.clone(),
            remarks: self.remarks.clone(),
            attachment: self.sample.as_deref().map(read_attachment).transpose()?,
            ..Default::default()
        };
        for selection in &self.also {
            submission.select_category(selection.category);
            if let Some(sub) = selection.subcategory {
                submission.select_subcategory(sub);
            }
        }
        Ok(submission)
    }

    fn linking_config(&self) -> Result<LinkingConfig> {
        let mut config = LinkingConfig::from_env()?;
        if let Some(fallback) = self.fallback {
            config.fallback = fallback;
        }
        if let Some(strategy) = self.id_strategy {
            config.id_strategy = strategy;
        }
        Ok(config)
    }
}

fn read_attachment(path: &Path) -> Result<Attachment> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Attachment {
        content_type: content_type_for(path).map(str::to_string),
        file_name,
        bytes,
    })
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => return None,
    })
}

/// Execute the documents subcommand.
pub async fn run_documents(args: &DocumentsArgs, conn: &ConnectionArgs) -> Result<u8> {
    match &args.command {
        DocumentsCommand::Create(create) => cmd_create(create, conn).await,
        DocumentsCommand::List {
            category,
            subcategory,
            json,
        } => cmd_list(conn, *category, *subcategory, *json).await,
        DocumentsCommand::Get { id } => cmd_get(conn, *id).await,
        DocumentsCommand::Delete { id } => cmd_delete(conn, *id).await,
    }
}

async fn cmd_create(args: &CreateArgs, conn: &ConnectionArgs) -> Result<u8> {
    let submission = args.to_submission()?;
    let ctx = conn.session()?;
    let client = conn.client()?;
    let catalog = client
        .catalog()
        .subcategories(ctx.incubator_id, None)
        .await
        .context("loading subcategory catalog")?;

    let linker = DocumentLinker::new(client, args.linking_config()?);
    let report = match linker.submit(&submission, &catalog, &ctx).await {
        Ok(report) => report,
        Err(LinkingError::Validation(fields)) => {
            eprintln!("submission rejected:");
            for (field, message) in fields.iter() {
                eprintln!("  {field}: {message}");
            }
            return Ok(EXIT_INVALID);
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    } else {
        print_report(&report);
    }

    Ok(match report.summary.status {
        SummaryStatus::Success => EXIT_OK,
        SummaryStatus::Partial => EXIT_PARTIAL,
        SummaryStatus::Failure => EXIT_FAILURE,
    })
}

fn print_report(report: &LinkingReport) {
    for category in &report.defaulted {
        println!("  note: category {category} filed under its first subcategory");
    }
    if report.resolution.preexisting > 0 {
        println!(
            "  note: {} older document(s) with this name were left unlinked",
            report.resolution.preexisting
        );
    }
    for resolved in &report.resolution.resolved {
        println!(
            "  document {} filed under {}",
            resolved.document_id, resolved.target
        );
    }
    println!("{}", report.summary);
}

async fn cmd_list(
    conn: &ConnectionArgs,
    category_id: Option<CategoryId>,
    subcategory_id: Option<SubcategoryId>,
    json: bool,
) -> Result<u8> {
    let client = conn.client()?;
    let filter = DocumentFilter {
        incubator_id: Some(conn.incubator()?),
        category_id,
        subcategory_id,
    };
    let rows = client.documents().list(&filter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_table(&rows));
    }
    Ok(EXIT_OK)
}

/// Render rows as a fixed-width table with a header line.
pub fn render_table(rows: &[DocumentRecord]) -> String {
    let mut out = format!(
        "{:>8}  {:<40}  {:>8}  {:>11}  {}\n",
        "ID", "NAME", "CATEGORY", "SUBCATEGORY", "APPLICABILITY"
    );
    for row in rows {
        out.push_str(&format!(
            "{:>8}  {:<40}  {:>8}  {:>11}  {}\n",
            row.id,
            row.document_name,
            row.category_id,
            row.subcategory_id,
            row.applicability.map(|a| a.as_str()).unwrap_or("-")
        ));
    }
    out
}

async fn cmd_get(conn: &ConnectionArgs, id: DocumentId) -> Result<u8> {
    let incubator_id = conn.incubator()?;
    match conn.client()?.documents().get(id, incubator_id).await? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(EXIT_OK)
        }
        None => {
            eprintln!("document {id} not found");
            Ok(EXIT_FAILURE)
        }
    }
}

async fn cmd_delete(conn: &ConnectionArgs, id: DocumentId) -> Result<u8> {
    let incubator_id = conn.incubator()?;
    conn.client()?.documents().delete(id, incubator_id).await?;
    println!("OK: deleted document {id}");
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_parses_category_with_optional_subcategory() {
        assert_eq!(
            "2:21".parse::<Selection>().unwrap(),
            Selection {
                category: CategoryId::new(2),
                subcategory: Some(SubcategoryId::new(21)),
            }
        );
        assert_eq!("3".parse::<Selection>().unwrap().subcategory, None);
        assert!("2:".parse::<Selection>().is_err());
        assert!("x".parse::<Selection>().is_err());
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for(Path::new("a/b.PDF")), Some("application/pdf"));
        assert_eq!(content_type_for(Path::new("notes")), None);
        assert_eq!(content_type_for(Path::new("x.bin")), None);
    }

    #[test]
    fn table_has_header_and_one_line_per_row() {
        let row = DocumentRecord {
            id: DocumentId::new(5),
            document_name: "Audit Report".into(),
            description: String::new(),
            category_id: CategoryId::new(1),
            subcategory_id: SubcategoryId::new(10),
            periodicity_id: None,
            applicability: Some(ims_core::Applicability::Mandatory),
            reference_link: None,
            applicability_note: None,
            remarks: None,
            sample_file_name: None,
            created_by: None,
            created_at: None,
        };
        let table = render_table(&[row]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("NAME"));
        assert!(lines[1].contains("Audit Report"));
        assert!(lines[1].ends_with("mandatory"));
    }
}
