use crate::{Error, PageCalculator, Result};

pub static PAGINATION_MAX_PER_PAGE_VAR: &str = "PAGINATION_MAX_PER_PAGE";

/// Upper bound on `per_page`, read once from `PAGINATION_MAX_PER_PAGE`.
pub fn pagination_max_per_page() -> &'static Option<u32> {
    use std::sync::OnceLock;
    static PAGINATION_MAX_PER_PAGE: OnceLock<Option<u32>> = OnceLock::new();
    PAGINATION_MAX_PER_PAGE.get_or_init(|| parse_max_per_page(std::env::var(PAGINATION_MAX_PER_PAGE_VAR).ok()))
}

fn parse_max_per_page(value: Option<String>) -> Option<u32> {
    let value = value?;
    match value.trim().parse::<u32>() {
        Ok(max) if max > 0 => Some(max),
        _ => {
            tracing::warn!(
                value = %value,
                "{PAGINATION_MAX_PER_PAGE_VAR} must be a positive integer, ignoring it"
            );
            None
        }
    }
}

/// Paginator settings; `orphans` and `allow_empty_first_page` default to
/// `0` and `true` when deserialized.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PaginatorOptions {
    pub per_page: u64,
    #[serde(default)]
    pub orphans: u64,
    #[serde(default = "default_allow_empty_first_page")]
    pub allow_empty_first_page: bool,
}

fn default_allow_empty_first_page() -> bool {
    true
}

impl PaginatorOptions {
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page,
            orphans: 0,
            allow_empty_first_page: default_allow_empty_first_page(),
        }
    }

    pub fn orphans(mut self, orphans: u64) -> Self {
        self.orphans = orphans;
        self
    }

    pub fn allow_empty_first_page(mut self, allow_empty_first_page: bool) -> Self {
        self.allow_empty_first_page = allow_empty_first_page;
        self
    }

    pub fn validate(self) -> Result<PageCalculator> {
        self.validate_against(*pagination_max_per_page())
    }

    pub(crate) fn validate_against(self, max: Option<u32>) -> Result<PageCalculator> {
        let too_large = max.is_some_and(|max| self.per_page > u64::from(max));
        if self.per_page == 0 || too_large {
            return Err(Error::InvalidPerPage {
                per_page: self.per_page,
                max,
            });
        }
        Ok(PageCalculator::new(self.per_page, self.orphans, self.allow_empty_first_page))
    }
}

impl From<u64> for PaginatorOptions {
    fn from(per_page: u64) -> Self {
        Self::new(per_page)
    }
}
