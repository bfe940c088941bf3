use crate::{
    CountCache, Error, Page, PageCalculator, PageNumber, PageRange, PageSource, PaginatorOptions, QueryDescriptor,
    QueryExecutor, RawQuerySource, Result,
};

/// Splits a [`PageSource`] into fixed-size pages.
///
/// The count is resolved on first use and kept for the paginator's lifetime,
/// so rows added or removed afterwards are not reflected in `count`,
/// `num_pages` or the page bounds. Build a new paginator to refresh it.
///
/// Count and page fetches are separate statements with no shared snapshot.
/// The cached count is not synchronized, so a paginator is `!Sync`.
#[derive(Debug)]
pub struct Paginator<S> {
    source: S,
    calculator: PageCalculator,
    count: CountCache,
}

pub type RawPaginator<'c, E> = Paginator<RawQuerySource<'c, E>>;

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S, options: impl Into<PaginatorOptions>) -> Result<Self> {
        Ok(Self::with_calculator(source, options.into().validate()?))
    }

    pub fn with_calculator(source: S, calculator: PageCalculator) -> Self {
        Self {
            source,
            calculator,
            count: CountCache::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn per_page(&self) -> u64 {
        self.calculator.per_page()
    }

    pub fn orphans(&self) -> u64 {
        self.calculator.orphans()
    }

    pub fn allow_empty_first_page(&self) -> bool {
        self.calculator.allow_empty_first_page()
    }

    /// Total number of items across all pages, counted once.
    pub fn count(&self) -> Result<u64> {
        self.count.get_or_resolve(|| self.source.count())
    }

    pub fn num_pages(&self) -> Result<u64> {
        Ok(self.calculator.num_pages(self.count()?))
    }

    pub fn page_range(&self) -> Result<PageRange> {
        Ok(self.calculator.page_range(self.count()?))
    }

    /// Checks a 1-based page number. Numbers below 1 are rejected without
    /// counting.
    pub fn validate_number<N: PageNumber>(&self, number: N) -> Result<u64> {
        let number = self.calculator.parse_number(&number)?;
        self.calculator.check_in_range(number, self.num_pages()?)
    }

    pub fn page<N: PageNumber>(&self, number: N) -> Result<Page<'_, S>> {
        let number = self.validate_number(number)?;
        let window = self.calculator.window(number, self.count()?);
        let items = self.source.fetch(window)?;
        Ok(Page::new(items, number, self))
    }

    /// Like [`page`](Self::page), but falls back to the first page for a
    /// non-integer number and to the last page for an out of range one.
    pub fn get_page<N: PageNumber>(&self, number: N) -> Result<Page<'_, S>> {
        match self.validate_number(number) {
            Ok(number) => self.page(number),
            Err(Error::PageNotAnInteger { .. }) => self.page(1u64),
            Err(Error::EmptyPage { .. }) => self.page(self.num_pages()?),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn cached_count(&self) -> u64 {
        self.count.get().unwrap_or_default()
    }

    pub(crate) fn calculator(&self) -> &PageCalculator {
        &self.calculator
    }
}

impl<'c, E: QueryExecutor + ?Sized> Paginator<RawQuerySource<'c, E>> {
    /// Pages `query` through `executor`, picking the bounded query syntax
    /// from the executor's vendor.
    pub fn raw(query: QueryDescriptor, executor: &'c E, options: impl Into<PaginatorOptions>) -> Result<Self> {
        Self::new(RawQuerySource::new(query, executor), options)
    }
}
