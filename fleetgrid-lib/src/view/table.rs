//! Table view composition.

use std::fmt::Debug;
use std::num::NonZeroUsize;

use super::comparator::{Column, ComparatorRegistry};
use super::filter::{RowFilter, filter_rows};
use super::page::Pagination;
use super::selection::{CheckState, Selection};
use super::sort::{SortDescriptor, SortDirection, sort_refs};
use super::status::TableStatus;
use crate::bulk::{BulkAction, BulkActionDispatcher};
use crate::config::ViewConfig;
use crate::error::ViewError;
use crate::resource::Identified;

/// The rows and metadata for one render of a table.
#[derive(Debug)]
pub struct TableWindow<'a, R: Identified> {
    /// Rows on the current page, filtered and sorted.
    pub rows: Vec<&'a R>,
    /// Ids of `rows`, in the same order.
    pub visible_ids: Vec<R::Id>,
    /// What the table should display.
    pub status: TableStatus,
    /// The page shown, after clamping.
    pub page: usize,
    /// Number of pages for the filtered rows.
    pub total_pages: usize,
    /// Number of rows that passed the filter, across all pages.
    pub filtered_count: usize,
    /// State of the "select all" checkbox for the rows on this page.
    pub header_check: CheckState,
}

/// View state of one table: columns, sort, selection and pagination.
///
/// Rows are never stored. Each call to [`TableView::render`] takes the
/// current rows from the resource store, so new data needs no invalidation.
/// Rendering is pure; only the explicit actions below change the view.
pub struct TableView<K, R: Identified, A = ()> {
    columns: Vec<Column<K, R, A>>,
    registry: ComparatorRegistry<K, R, A>,
    sort: SortDescriptor<K>,
    selection: Selection<R::Id>,
    pagination: Pagination,
    reset_selection_after_bulk: bool,
}

impl<K, R, A> TableView<K, R, A>
where
    K: Clone + PartialEq + Debug,
    R: Identified,
{
    /// Creates a view with the default configuration.
    pub fn new(columns: Vec<Column<K, R, A>>) -> Result<Self, ViewError> {
        Self::from_config(columns, &ViewConfig::default())
    }

    /// Creates a view, validating the columns and the page size.
    pub fn from_config(columns: Vec<Column<K, R, A>>, config: &ViewConfig) -> Result<Self, ViewError> {
        let registry = ComparatorRegistry::from_columns(&columns)?;
        Ok(Self {
            columns,
            registry,
            sort: SortDescriptor::unsorted(),
            selection: Selection::new(),
            pagination: Pagination::new(config.page_size()?),
            reset_selection_after_bulk: config.reset_selection_after_bulk,
        })
    }

    /// Sets the initial sort.
    pub fn with_sort(mut self, key: K, direction: SortDirection) -> Result<Self, ViewError> {
        self.set_sort(SortDescriptor::new(key, direction))?;
        Ok(self)
    }

    /// Returns the column definitions in display order.
    pub fn columns(&self) -> &[Column<K, R, A>] {
        &self.columns
    }

    /// Returns the active sort.
    pub fn sort(&self) -> &SortDescriptor<K> {
        &self.sort
    }

    /// Returns the selected ids, including ids not in the current rows.
    pub fn selection(&self) -> &Selection<R::Id> {
        &self.selection
    }

    /// Returns the page size and the requested page.
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn check_key(&self, key: &K) -> Result<(), ViewError> {
        if self.registry.contains(key) {
            Ok(())
        } else {
            log::warn!("Rejected sort on unregistered key {:?}", key);
            Err(ViewError::unknown_sort_key(key))
        }
    }

    /// Handles activation of the header for `key`.
    pub fn update_sort(&mut self, key: K) -> Result<&SortDescriptor<K>, ViewError> {
        self.check_key(&key)?;
        self.sort = std::mem::take(&mut self.sort).update_sort(key);
        log::debug!("Sort is now {:?}", self.sort);
        Ok(&self.sort)
    }

    /// Replaces the sort descriptor.
    pub fn set_sort(&mut self, sort: SortDescriptor<K>) -> Result<(), ViewError> {
        if let Some(key) = sort.key() {
            self.check_key(key)?;
        }
        self.sort = sort;
        Ok(())
    }

    /// Toggles the selection of one row.
    pub fn toggle_row(&mut self, id: &R::Id) {
        self.selection = self.selection.toggle_one(id);
    }

    /// Handles the "select all" checkbox for the rows of a rendered page.
    pub fn toggle_page(&mut self, window: &TableWindow<'_, R>) {
        self.selection = self.selection.toggle_all(&window.visible_ids);
    }

    /// Replaces the selection.
    pub fn set_selection(&mut self, selection: Selection<R::Id>) {
        self.selection = selection;
    }

    /// Deselects every row.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::new();
    }

    /// Moves to `page`, clamped for `total` filtered rows.
    pub fn set_page(&mut self, page: usize, total: usize) {
        self.pagination.set_page(page, total);
    }

    /// Moves past the page shown for `total` filtered rows. Returns `false`
    /// on the last page.
    pub fn next_page(&mut self, total: usize) -> bool {
        self.pagination.next_page(total)
    }

    /// Moves before the page shown for `total` filtered rows. Returns `false`
    /// on the first page.
    pub fn prev_page(&mut self, total: usize) -> bool {
        self.pagination.prev_page(total)
    }

    /// Stores the page shown for `total` filtered rows, e.g. after the filter
    /// changed. Returns `true` if the page moved.
    pub fn clamp_page(&mut self, total: usize) -> bool {
        self.pagination.clamp(total)
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.pagination.set_page_size(page_size);
    }

    /// Filters, sorts and paginates `rows`.
    ///
    /// Calling this twice with the same inputs gives the same rows in the
    /// same order, as references into `rows`.
    pub fn render<'a, F>(
        &self,
        rows: &'a [R],
        is_loading: bool,
        filter: &F,
        aux: Option<&A>,
    ) -> TableWindow<'a, R>
    where
        F: RowFilter<R> + ?Sized,
    {
        let filtered = filter_rows(rows, filter);
        let sorted = sort_refs(filtered, &self.sort, &self.registry, aux);
        let filtered_count = sorted.len();
        let (page, page_rows) = self.pagination.window(&sorted);
        let page_rows = page_rows.to_vec();
        let visible_ids: Vec<R::Id> = page_rows.iter().map(|row| row.id()).collect();

        TableWindow {
            header_check: self.selection.check_state(&visible_ids),
            status: TableStatus::resolve(is_loading, filter.is_active(), filtered_count),
            total_pages: self.pagination.total_pages(filtered_count),
            rows: page_rows,
            visible_ids,
            page,
            filtered_count,
        }
    }

    /// Sends the selection to `dispatcher` as a bulk `action`.
    ///
    /// An empty selection is not dispatched. On success the selection is
    /// cleared unless the view was configured to keep it.
    pub async fn dispatch_bulk<D>(
        &mut self,
        action: &str,
        dispatcher: &D,
    ) -> Result<BulkAction<R::Id>, ViewError>
    where
        D: BulkActionDispatcher<R::Id> + ?Sized,
        R::Id: Sync,
    {
        let payload = self.selection.to_bulk_action(action);
        if payload.is_empty() {
            log::debug!("Nothing selected for bulk action '{}'", action);
            return Ok(payload);
        }

        log::debug!("Dispatching '{}' for {} rows", action, payload.ids().len());
        if let Err(err) = dispatcher.dispatch(&payload).await {
            log::warn!("{}", err);
            return Err(err.into());
        }

        if self.reset_selection_after_bulk {
            self.clear_selection();
        }
        Ok(payload)
    }
}
