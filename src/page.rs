use crate::{PageSource, Paginator, Result};
use ::derivative::Derivative;
use ::std::ops::Deref;

/// One materialized page of rows.
///
/// Borrows the [`Paginator`] that produced it for the derived queries
/// (`has_next`, `end_index`, ...); `items` and `number` stand on their own.
#[derive(Derivative)]
#[derivative(
    Clone(bound = "S::Item: Clone"),
    Debug(bound = "S::Item: ::std::fmt::Debug")
)]
pub struct Page<'p, S: PageSource> {
    items: Vec<S::Item>,
    number: u64,
    #[derivative(Debug = "ignore")]
    paginator: &'p Paginator<S>,
}

/// Serializable pagination metadata for a [`Page`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PageSummary {
    pub number: u64,
    pub per_page: u64,
    pub len: u64,
    pub count: u64,
    pub num_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub start_index: u64,
    pub end_index: u64,
}

impl<'p, S: PageSource> Page<'p, S> {
    pub(crate) fn new(items: Vec<S::Item>, number: u64, paginator: &'p Paginator<S>) -> Self {
        Self {
            items,
            number,
            paginator,
        }
    }

    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<S::Item> {
        self.items
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn paginator(&self) -> &'p Paginator<S> {
        self.paginator
    }

    fn num_pages(&self) -> u64 {
        self.paginator
            .calculator()
            .num_pages(self.paginator.cached_count())
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_previous() || self.has_next()
    }

    pub fn next_page_number(&self) -> Result<u64> {
        self.paginator.validate_number(self.number.saturating_add(1))
    }

    pub fn previous_page_number(&self) -> Result<u64> {
        self.paginator.validate_number(self.number.saturating_sub(1))
    }

    /// 1-based index of the first item on this page, 0 if there are no items at all.
    pub fn start_index(&self) -> u64 {
        if self.paginator.cached_count() == 0 {
            return 0;
        }
        (self.number - 1) * self.paginator.per_page() + 1
    }

    /// 1-based index of the last item on this page, taking orphans into account.
    pub fn end_index(&self) -> u64 {
        if self.number == self.num_pages() {
            return self.paginator.cached_count();
        }
        self.number * self.paginator.per_page()
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            number: self.number,
            per_page: self.paginator.per_page(),
            len: self.items.len() as u64,
            count: self.paginator.cached_count(),
            num_pages: self.num_pages(),
            has_next: self.has_next(),
            has_previous: self.has_previous(),
            start_index: self.start_index(),
            end_index: self.end_index(),
        }
    }
}

impl<S: PageSource> Deref for Page<'_, S> {
    type Target = Vec<S::Item>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<S: PageSource> IntoIterator for Page<'_, S> {
    type Item = S::Item;
    type IntoIter = std::vec::IntoIter<S::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, S: PageSource> IntoIterator for &'a Page<'_, S> {
    type Item = &'a S::Item;
    type IntoIter = std::slice::Iter<'a, S::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
