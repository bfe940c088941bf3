use crate::{PageWindow, Result};

/// Where a [`Paginator`](crate::Paginator) gets its row count and rows from.
pub trait PageSource {
    type Item;

    /// Total number of items; the paginator calls this at most once.
    fn count(&self) -> Result<u64>;

    fn fetch(&self, window: PageWindow) -> Result<Vec<Self::Item>>;
}

fn slice_window<T: Clone>(items: &[T], window: PageWindow) -> Vec<T> {
    let len = items.len() as u64;
    let start = window.offset.min(len) as usize;
    let end = window.end().min(len) as usize;
    items[start..end].to_vec()
}

impl<T: Clone> PageSource for &[T] {
    type Item = T;

    fn count(&self) -> Result<u64> {
        Ok(self.len() as u64)
    }

    fn fetch(&self, window: PageWindow) -> Result<Vec<T>> {
        Ok(slice_window(self, window))
    }
}

impl<T: Clone> PageSource for Vec<T> {
    type Item = T;

    fn count(&self) -> Result<u64> {
        Ok(self.len() as u64)
    }

    fn fetch(&self, window: PageWindow) -> Result<Vec<T>> {
        Ok(slice_window(self, window))
    }
}
