//! Pagination of in-memory slices.

use paginate_core::config::DEFAULT_PER_PAGE;
use paginate_core::result::PaginateResult;
use paginate_core::types::{Collection, PaginateOptions};

/// Page through a slice that is already loaded.
pub trait PaginateSlice<T> {
    /// Cut one page out of the slice. The total defaults to the slice
    /// length; finder options in `options` are ignored.
    fn paginate(&self, options: &PaginateOptions) -> PaginateResult<Collection<T>>;
}

impl<T: Clone> PaginateSlice<T> for [T] {
    fn paginate(&self, options: &PaginateOptions) -> PaginateResult<Collection<T>> {
        let per_page = options.per_page.unwrap_or(DEFAULT_PER_PAGE as i64);
        let total = options.total_entries.unwrap_or(self.len() as u64);
        let mut pager = Collection::new(options.page.unwrap_or(1), per_page, Some(total))?;

        let start = usize::try_from(pager.offset())
            .unwrap_or(usize::MAX)
            .min(self.len());
        let end = usize::try_from(pager.per_page())
            .map_or(self.len(), |n| start.saturating_add(n))
            .min(self.len());
        pager.replace(self[start..end].to_vec());
        Ok(pager)
    }
}
