//! The page collection returned by every paginating finder.

use std::ops::Deref;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::trace;

use crate::error::{ErrorKind, PaginateError};
use crate::result::PaginateResult;

/// One page of records together with its pagination metadata.
///
/// A collection is created before the records are fetched so that the
/// finder can read [`offset`](Self::offset) and
/// [`per_page`](Self::per_page). The total is either supplied up front,
/// inferred by [`replace`](Self::replace), or set after a count query.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    entries: Vec<T>,
    current_page: u64,
    per_page: u64,
    total_entries: Option<u64>,
    total_pages: Option<u64>,
}

impl<T> Collection<T> {
    /// Create an empty page.
    ///
    /// Fails when `page` or `per_page` is below 1, or when the page starts
    /// past the largest offset a database can bind (`i64::MAX`).
    pub fn new(page: i64, per_page: i64, total_entries: Option<u64>) -> PaginateResult<Self> {
        let current_page = u64::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| PaginateError::invalid_page(page))?;
        let per_page = u64::try_from(per_page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| {
                PaginateError::invalid_argument(format!(
                    "`per_page` setting cannot be less than 1 ({per_page} given)"
                ))
            })?;
        (current_page - 1)
            .checked_mul(per_page)
            .filter(|offset| *offset <= i64::MAX as u64)
            .ok_or_else(|| {
                PaginateError::new(
                    ErrorKind::InvalidPage,
                    format!("page {page} with {per_page} per page is out of range"),
                )
            })?;

        let mut collection = Self {
            entries: Vec::new(),
            current_page,
            per_page,
            total_entries: None,
            total_pages: None,
        };
        if let Some(total) = total_entries {
            collection.set_total_entries(total);
        }
        Ok(collection)
    }

    /// Current page number (1-based).
    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    /// Page size.
    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Total number of records across all pages, once known.
    pub fn total_entries(&self) -> Option<u64> {
        self.total_entries
    }

    /// Total number of pages, once the total is known.
    pub fn total_pages(&self) -> Option<u64> {
        self.total_pages
    }

    /// Number of records preceding this page.
    pub fn offset(&self) -> u64 {
        (self.current_page - 1) * self.per_page
    }

    /// Previous page number, or `None` on the first page.
    pub fn previous_page(&self) -> Option<u64> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    /// Next page number, or `None` on (or past) the last page.
    pub fn next_page(&self) -> Option<u64> {
        self.total_pages
            .filter(|total| self.current_page < *total)
            .map(|_| self.current_page + 1)
    }

    /// Whether the current page lies past the last page.
    pub fn out_of_bounds(&self) -> bool {
        self.total_pages
            .is_some_and(|total| self.current_page > total)
    }

    /// Set the total and derive the page count from it.
    pub fn set_total_entries(&mut self, total: u64) {
        self.total_entries = Some(total);
        self.total_pages = Some(total.div_ceil(self.per_page));
    }

    /// Replace the page contents.
    ///
    /// When the total is unknown and the page came back short, this is the
    /// last page and the total is `offset + len`. An empty page past the
    /// first tells nothing about the total, so it stays unknown.
    pub fn replace(&mut self, entries: Vec<T>) {
        self.entries = entries;
        let len = self.entries.len() as u64;
        if self.total_entries.is_none()
            && len < self.per_page
            && (self.current_page == 1 || len > 0)
        {
            let total = self.offset().saturating_add(len);
            trace!(page = self.current_page, total, "Inferred total from a short page");
            self.set_total_entries(total);
        }
    }

    /// The records on this page.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Consume the page, returning its records.
    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }

    /// Transform the records, keeping the pagination metadata.
    pub fn map<U, F>(self, f: F) -> Collection<U>
    where
        F: FnMut(T) -> U,
    {
        Collection {
            entries: self.entries.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total_entries: self.total_entries,
            total_pages: self.total_pages,
        }
    }
}

impl<T> Deref for Collection<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.entries
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for Collection<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.entries == *other
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Collection", 7)?;
        state.serialize_field("entries", &self.entries)?;
        state.serialize_field("current_page", &self.current_page)?;
        state.serialize_field("per_page", &self.per_page)?;
        state.serialize_field("total_entries", &self.total_entries)?;
        state.serialize_field("total_pages", &self.total_pages)?;
        state.serialize_field("previous_page", &self.previous_page())?;
        state.serialize_field("next_page", &self.next_page())?;
        state.end()
    }
}
