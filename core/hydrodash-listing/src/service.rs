//! Per-resource listing façade.

use hydrodash_model::{ResourceSchema, UpdateValidator};
use hydrodash_types::{FieldErrors, RecordId, RecordUpdate, ResourceKind, ResourceRecord};
use std::sync::Arc;
use tracing::{debug, info};

use crate::archive::{ArchiveOutcome, ArchivePartitioner};
use crate::error::{ListingError, ListingResult, StoreError};
use crate::filter::{ArchivePartition, FilterSpec};
use crate::paginator::LinkBuilder;
use crate::query::ListingQueryEngine;
use crate::request::{ListingConfig, ListingRequest};
use crate::response::{ListingResponse, PaginationMeta};
use crate::sort::{resolve_sort, SortSpec};
use crate::store::RecordStore;

/// Path prefix of the listing API, used when building page links.
pub const API_PREFIX: &str = "/api/v1";

/// Listing, archive and update operations for one resource kind.
pub struct ListingService<S> {
    engine: ListingQueryEngine,
    store: Arc<S>,
    partitioner: ArchivePartitioner<S>,
    config: ListingConfig,
}

impl<S> Clone for ListingService<S> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine,
            store: Arc::clone(&self.store),
            partitioner: self.partitioner.clone(),
            config: self.config,
        }
    }
}

impl<S: RecordStore> ListingService<S> {
    pub fn new(kind: ResourceKind, store: Arc<S>, config: ListingConfig) -> Self {
        Self {
            engine: ListingQueryEngine::for_kind(kind),
            partitioner: ArchivePartitioner::new(kind, Arc::clone(&store)),
            store,
            config,
        }
    }

    /// Users service with default page limits.
    pub fn users(store: Arc<S>) -> Self {
        Self::new(ResourceKind::Users, store, ListingConfig::default())
    }

    /// Devices service with default page limits.
    pub fn devices(store: Arc<S>) -> Self {
        Self::new(ResourceKind::Devices, store, ListingConfig::default())
    }

    pub fn kind(&self) -> ResourceKind {
        self.schema().kind
    }

    pub fn schema(&self) -> &'static ResourceSchema {
        self.engine.schema()
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    /// Lists one page of the given partition.
    ///
    /// The response echoes the resolved filters and sort, which may differ
    /// from what was requested when values fell back to defaults.
    pub fn list(
        &self,
        request: &ListingRequest,
        partition: ArchivePartition,
    ) -> ListingResult<ListingResponse> {
        let schema = self.schema();
        let filter = FilterSpec::build(schema, request, partition);
        let sort = resolve_sort(
            schema,
            request.sort_column.as_deref(),
            request.sort_direction.as_deref(),
            None,
        );
        let per_page = self.config.per_page(request.per_page);
        let query = self.engine.compile(&filter, &sort);

        let (window, items) = self
            .store
            .fetch_page(&query, request.page.unwrap_or(1), per_page)?;
        debug!(
            kind = %schema.kind,
            %partition,
            narrowed = filter.is_narrowed(),
            total = window.total,
            page = window.page,
            returned = items.len(),
            "listing served"
        );

        let links = window.links(&self.link_builder(&filter, &sort, partition, per_page));
        Ok(ListingResponse {
            items,
            pagination: PaginationMeta::new(&window, links),
            echoed_filters: filter.echo(),
            echoed_sort: sort,
        })
    }

    /// Moves a record into the archived partition.
    pub fn archive(&self, id: RecordId) -> ListingResult<ArchiveOutcome> {
        self.partitioner.archive(id)
    }

    /// Moves a record back into the active partition.
    pub fn unarchive(&self, id: RecordId) -> ListingResult<ArchiveOutcome> {
        self.partitioner.unarchive(id)
    }

    /// Validates and applies an admin edit. Concurrent edits are
    /// last-write-wins.
    pub fn update(&self, id: RecordId, update: &RecordUpdate) -> ListingResult<ResourceRecord> {
        let kind = self.kind();
        if update.kind() != kind {
            return Err(ListingError::WrongResource {
                expected: kind,
                found: update.kind(),
            });
        }
        update.validate().map_err(ListingError::ValidationFailed)?;

        let updated = match update {
            RecordUpdate::User(u) => self.store.update_user(id, u).map(|r| r.map(ResourceRecord::from)),
            RecordUpdate::Device(d) => {
                self.store.update_device(id, d).map(|r| r.map(ResourceRecord::from))
            }
        };
        match updated {
            Ok(Some(record)) => {
                info!(%kind, %id, "record updated");
                Ok(record)
            }
            Ok(None) => Err(ListingError::RecordNotFound { kind, id }),
            Err(StoreError::UniqueViolation { field }) => {
                let mut errors = FieldErrors::new();
                errors.insert(field.clone(), format!("The {field} has already been taken."));
                Err(ListingError::ValidationFailed(errors))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn link_builder(
        &self,
        filter: &FilterSpec,
        sort: &SortSpec,
        partition: ArchivePartition,
        per_page: u64,
    ) -> LinkBuilder {
        let mut path = format!("{API_PREFIX}/{}", self.kind().path_segment());
        if partition.is_archived() {
            path.push_str("/archived");
        }
        let mut builder = LinkBuilder::new(path);
        if let Some(search) = &filter.search {
            builder = builder.param("search", search);
        }
        for choice in &filter.choices {
            if let Some(option) = choice.selected {
                builder = builder.param(choice.filter.param, option.token);
            }
        }
        builder
            .param("sort", &sort.column)
            .param("direction", sort.direction.as_str())
            .param("perPage", per_page.to_string())
    }
}
