use ::std::cmp::Ordering;

/// The contiguous row range `[offset, offset + limit)` a page covers.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PageWindow {
    pub limit: u64,
    pub offset: u64,
}

impl PageWindow {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Exclusive upper bound of the window.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.limit)
    }

    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

impl Ord for PageWindow {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset.cmp(&other.offset).then(self.limit.cmp(&other.limit))
    }
}

impl PartialOrd for PageWindow {
    fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}
