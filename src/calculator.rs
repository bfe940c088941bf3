use crate::{Error, PageWindow, Result};
use ::std::iter::FusedIterator;
use ::std::ops::RangeInclusive;

/// Anything that can be interpreted as a 1-based page number.
///
/// Strings are trimmed and parsed as base 10, so a page number taken
/// straight from a query string can be passed through unchanged. Integer
/// strings too long for `i64` saturate, the same way wide integer types do.
pub trait PageNumber {
    /// `None` when the value is not an integer.
    fn to_page_number(&self) -> Option<i64>;

    fn describe(&self) -> String;
}

macro_rules! lossless_page_number {
    ($($ty:ty),*$(,)?) => {
        $(
            impl PageNumber for $ty {
                fn to_page_number(&self) -> Option<i64> {
                    Some(i64::from(*self))
                }
                fn describe(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

macro_rules! wide_page_number {
    ($($ty:ty),*$(,)?) => {
        $(
            impl PageNumber for $ty {
                // anything past i64::MAX is out of range anyway
                fn to_page_number(&self) -> Option<i64> {
                    Some(i64::try_from(*self).unwrap_or(i64::MAX))
                }
                fn describe(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

lossless_page_number!(i8, i16, i32, i64, u8, u16, u32);
wide_page_number!(u64, usize, isize);

impl PageNumber for str {
    fn to_page_number(&self) -> Option<i64> {
        let token = self.trim();
        if let Ok(number) = token.parse::<i64>() {
            return Some(number);
        }
        let (negative, digits) = match token.as_bytes().first() {
            Some(b'-') => (true, &token[1..]),
            Some(b'+') => (false, &token[1..]),
            _ => (false, token),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(if negative { i64::MIN } else { i64::MAX })
    }
    fn describe(&self) -> String {
        self.to_owned()
    }
}

impl PageNumber for String {
    fn to_page_number(&self) -> Option<i64> {
        self.as_str().to_page_number()
    }
    fn describe(&self) -> String {
        self.clone()
    }
}

impl<T: PageNumber + ?Sized> PageNumber for &T {
    fn to_page_number(&self) -> Option<i64> {
        (**self).to_page_number()
    }
    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Pure page arithmetic over a row count.
///
/// Built by [`PaginatorOptions::validate`](crate::PaginatorOptions::validate),
/// which guarantees a non-zero `per_page`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PageCalculator {
    per_page: u64,
    orphans: u64,
    allow_empty_first_page: bool,
}

impl PageCalculator {
    pub(crate) fn new(per_page: u64, orphans: u64, allow_empty_first_page: bool) -> Self {
        debug_assert!(per_page > 0, "per_page must be validated before use");
        Self {
            per_page,
            orphans,
            allow_empty_first_page,
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn orphans(&self) -> u64 {
        self.orphans
    }

    pub fn allow_empty_first_page(&self) -> bool {
        self.allow_empty_first_page
    }

    pub fn num_pages(&self, count: u64) -> u64 {
        if count == 0 && !self.allow_empty_first_page {
            return 0;
        }
        let hits = count.saturating_sub(self.orphans).max(1);
        hits.div_ceil(self.per_page)
    }

    pub fn page_range(&self, count: u64) -> PageRange {
        PageRange::new(self.num_pages(count))
    }

    /// Checks the lower bound only, so it never needs the row count.
    pub fn parse_number<N: PageNumber + ?Sized>(&self, number: &N) -> Result<u64> {
        let parsed = number.to_page_number().ok_or_else(|| Error::PageNotAnInteger {
            token: number.describe(),
        })?;
        if parsed < 1 {
            return Err(Error::below_range(parsed));
        }
        Ok(parsed as u64)
    }

    /// Upper bound check; page 1 is always valid when an empty first page is allowed.
    pub fn check_in_range(&self, number: u64, num_pages: u64) -> Result<u64> {
        if number > num_pages && !(number == 1 && self.allow_empty_first_page) {
            return Err(Error::no_results(i64::try_from(number).unwrap_or(i64::MAX)));
        }
        Ok(number)
    }

    pub fn validate_number<N: PageNumber + ?Sized>(&self, number: &N, num_pages: u64) -> Result<u64> {
        let number = self.parse_number(number)?;
        self.check_in_range(number, num_pages)
    }

    /// Rows covered by an already validated page number. The page that would
    /// leave `orphans` or fewer rows behind absorbs them.
    pub fn window(&self, number: u64, count: u64) -> PageWindow {
        let offset = number.saturating_sub(1).saturating_mul(self.per_page);
        let mut limit = self.per_page;
        if offset.saturating_add(limit).saturating_add(self.orphans) >= count {
            limit = count.saturating_sub(offset);
        }
        PageWindow::new(limit, offset)
    }
}

/// The valid page numbers `1..=num_pages`.
///
/// `Copy`, so it can be iterated any number of times.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PageRange {
    num_pages: u64,
}

impl PageRange {
    pub fn new(num_pages: u64) -> Self {
        Self { num_pages }
    }

    pub fn len(&self) -> u64 {
        self.num_pages
    }

    pub fn is_empty(&self) -> bool {
        self.num_pages == 0
    }

    pub fn contains(&self, number: u64) -> bool {
        (1..=self.num_pages).contains(&number)
    }

    pub fn iter(&self) -> PageRangeIter {
        PageRangeIter(1..=self.num_pages)
    }
}

#[derive(Clone, Debug)]
pub struct PageRangeIter(RangeInclusive<u64>);

impl Iterator for PageRangeIter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl DoubleEndedIterator for PageRangeIter {
    fn next_back(&mut self) -> Option<u64> {
        self.0.next_back()
    }
}

impl FusedIterator for PageRangeIter {}

impl IntoIterator for PageRange {
    type Item = u64;
    type IntoIter = PageRangeIter;

    fn into_iter(self) -> PageRangeIter {
        self.iter()
    }
}

impl IntoIterator for &PageRange {
    type Item = u64;
    type IntoIter = PageRangeIter;

    fn into_iter(self) -> PageRangeIter {
        self.iter()
    }
}
