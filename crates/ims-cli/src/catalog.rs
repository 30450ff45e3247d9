//! # Catalog Subcommand
//!
//! `ims catalog` prints the incubator's categories with their subcategories
//! in catalog order, followed by the periodicities. The first subcategory
//! listed under a category is the one unselected categories fall back to.

use anyhow::{Context, Result};
use clap::Args;
use ims_core::{Category, Periodicity, Subcategory};
use serde::Serialize;

use crate::connection::ConnectionArgs;
use crate::EXIT_OK;

/// Arguments for the `ims catalog` subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Print JSON instead of an indented tree.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CatalogView<'a> {
    categories: &'a [Category],
    subcategories: &'a [Subcategory],
    periodicities: &'a [Periodicity],
}

/// Execute the catalog subcommand.
pub async fn run_catalog(args: &CatalogArgs, conn: &ConnectionArgs) -> Result<u8> {
    let client = conn.client()?;
    let incubator = conn.incubator()?;
    let catalog = client.catalog();

    let categories = catalog
        .categories(incubator)
        .await
        .context("loading categories")?;
    let subcategories = catalog
        .subcategories(incubator, None)
        .await
        .context("loading subcategories")?;
    let periodicities = catalog
        .periodicities()
        .await
        .context("loading periodicities")?;

    if args.json {
        let view = CatalogView {
            categories: &categories,
            subcategories: &subcategories,
            periodicities: &periodicities,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_tree(&categories, &subcategories, &periodicities));
    }
    Ok(EXIT_OK)
}

/// Render the catalog as an indented tree.
pub fn render_tree(
    categories: &[Category],
    subcategories: &[Subcategory],
    periodicities: &[Periodicity],
) -> String {
    let mut out = String::from("Categories:\n");
    for category in categories {
        out.push_str(&format!("  {:>4}  {}\n", category.id, category.name));
        let mut owned = subcategories
            .iter()
            .filter(|s| s.category_id == category.id)
            .peekable();
        if owned.peek().is_none() {
            out.push_str("        (no subcategories)\n");
        }
        for (i, sub) in owned.enumerate() {
            let marker = if i == 0 { "  (default)" } else { "" };
            out.push_str(&format!("        {:>4}  {}{marker}\n", sub.id, sub.name));
        }
    }
    out.push_str("Periodicities:\n");
    for p in periodicities {
        out.push_str(&format!("  {:>4}  {}\n", p.id, p.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ims_core::{CategoryId, PeriodicityId, SubcategoryId};

    #[test]
    fn tree_marks_default_subcategory_and_empty_categories() {
        let categories = vec![
            Category {
                id: CategoryId::new(1),
                name: "Finance".into(),
            },
            Category {
                id: CategoryId::new(2),
                name: "Misc".into(),
            },
        ];
        let subs = vec![
            Subcategory {
                id: SubcategoryId::new(10),
                category_id: CategoryId::new(1),
                name: "Audit".into(),
            },
            Subcategory {
                id: SubcategoryId::new(11),
                category_id: CategoryId::new(1),
                name: "Tax".into(),
            },
        ];
        let periods = vec![Periodicity {
            id: PeriodicityId::new(2),
            name: "Quarterly".into(),
        }];

        let tree = render_tree(&categories, &subs, &periods);
        assert!(tree.contains("10  Audit  (default)"));
        assert!(tree.contains("11  Tax\n"));
        assert!(tree.contains("(no subcategories)"));
        assert!(tree.contains("2  Quarterly"));
    }
}
