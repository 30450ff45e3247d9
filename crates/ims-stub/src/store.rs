// SPDX-License-Identifier: BUSL-1.1
//! In-memory storage backend using DashMap.
//!
//! Documents and links each get a `DashMap<u64, _>` keyed by an ascending
//! identifier. The catalog is fixed at construction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use ims_core::{
    Category, CategoryId, DocumentRecord, IncubatorId, LinkRecord, Periodicity, PeriodicityId,
    Subcategory, SubcategoryId,
};

/// A document row plus the tenant it belongs to.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub incubator_id: IncubatorId,
    pub record: DocumentRecord,
}

/// Stub behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubOptions {
    /// Answer document creates with a free-text `data` string instead of
    /// the new identifier.
    pub omit_create_ids: bool,
}

impl StubOptions {
    /// Read `IMS_STUB_OMIT_IDS` (`1` or `true` enables it).
    pub fn from_env() -> Self {
        let omit_create_ids = std::env::var("IMS_STUB_OMIT_IDS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self { omit_create_ids }
    }
}

struct Inner {
    options: StubOptions,
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
    periodicities: Vec<Periodicity>,
    documents: DashMap<u64, StoredDocument>,
    links: DashMap<u64, LinkRecord>,
    next_document_id: AtomicU64,
    next_link_id: AtomicU64,
}

/// Shared application state holding all in-memory stores.
///
/// Cheaply cloneable via `Arc`; all clones share the same data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    /// State with the default seeded catalog.
    pub fn new(options: StubOptions) -> Self {
        let (categories, subcategories, periodicities) = seed_catalog();
        Self::with_catalog(options, categories, subcategories, periodicities)
    }

    /// State with an explicit catalog.
    pub fn with_catalog(
        options: StubOptions,
        categories: Vec<Category>,
        subcategories: Vec<Subcategory>,
        periodicities: Vec<Periodicity>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                options,
                categories,
                subcategories,
                periodicities,
                documents: DashMap::new(),
                links: DashMap::new(),
                next_document_id: AtomicU64::new(1),
                next_link_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn options(&self) -> StubOptions {
        self.inner.options
    }

    pub fn categories(&self) -> &[Category] {
        &self.inner.categories
    }

    pub fn subcategories(&self) -> &[Subcategory] {
        &self.inner.subcategories
    }

    pub fn periodicities(&self) -> &[Periodicity] {
        &self.inner.periodicities
    }

    pub fn documents(&self) -> &DashMap<u64, StoredDocument> {
        &self.inner.documents
    }

    pub fn links(&self) -> &DashMap<u64, LinkRecord> {
        &self.inner.links
    }

    pub fn next_document_id(&self) -> u64 {
        self.inner.next_document_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn next_link_id(&self) -> u64 {
        self.inner.next_link_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Whether `subcategory_id` exists and belongs to `category_id`.
    pub fn owns(&self, category_id: CategoryId, subcategory_id: SubcategoryId) -> bool {
        self.inner
            .subcategories
            .iter()
            .any(|s| s.id == subcategory_id && s.category_id == category_id)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(StubOptions::default())
    }
}

fn seed_catalog() -> (Vec<Category>, Vec<Subcategory>, Vec<Periodicity>) {
    let categories = [
        (1, "Legal & Compliance"),
        (2, "Finance"),
        (3, "Governance"),
    ]
    .into_iter()
    .map(|(id, name)| Category {
        id: CategoryId::new(id),
        name: name.into(),
    })
    .collect();

    let subcategories = [
        (10, 1, "Incorporation"),
        (11, 1, "Licences & Permits"),
        (21, 2, "Audit"),
        (22, 2, "Tax Filings"),
        (30, 3, "Board Meetings"),
    ]
    .into_iter()
    .map(|(id, category, name)| Subcategory {
        id: SubcategoryId::new(id),
        category_id: CategoryId::new(category),
        name: name.into(),
    })
    .collect();

    let periodicities = [(1, "Monthly"), (2, "Quarterly"), (3, "Annual"), (4, "One-time")]
        .into_iter()
        .map(|(id, name)| Periodicity {
            id: PeriodicityId::new(id),
            name: name.into(),
        })
        .collect();

    (categories, subcategories, periodicities)
}
