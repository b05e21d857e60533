//! Pagination arithmetic shared by every list and history query.
//!
//! Page numbers are 1-based at every external boundary; the translation
//! to 0-based offsets happens here, immediately before the store call.

use serde::Serialize;

/// Page size applied when a request leaves it unspecified.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Normalised pagination parameters. Construction clamps both values to
/// at least 1, so a `PageRequest` can never produce a negative offset or
/// a zero-sized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  page_size:   u32,
  page_number: u32,
}

impl PageRequest {
  pub fn new(page_size: u32, page_number: u32) -> Self {
    Self {
      page_size:   page_size.max(1),
      page_number: page_number.max(1),
    }
  }

  pub fn page_size(&self) -> u32 { self.page_size }

  pub fn page_number(&self) -> u32 { self.page_number }

  /// 0-based offset of the first item on this page.
  pub fn offset(&self) -> u64 {
    u64::from(self.page_number - 1) * u64::from(self.page_size)
  }

  pub fn limit(&self) -> u64 { u64::from(self.page_size) }

  /// The sub-slice of `items` covered by this page. A page past the end
  /// is an empty slice, not an error.
  pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
    let start = usize::try_from(self.offset())
      .unwrap_or(usize::MAX)
      .min(items.len());
    let end = start.saturating_add(self.page_size as usize).min(items.len());
    &items[start..end]
  }
}

impl Default for PageRequest {
  fn default() -> Self { Self::new(DEFAULT_PAGE_SIZE, 1) }
}

/// Ceiling division of `total` by `page_size`, never less than 1 — an
/// empty collection still has one (empty) page.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
  let size = u64::from(page_size.max(1));
  let pages = total.div_ceil(size).max(1);
  u32::try_from(pages).unwrap_or(u32::MAX)
}

/// The response envelope for every paginated query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
  pub content:     Vec<T>,
  pub page_number: u32,
  pub total_pages: u32,
}

impl<T> Page<T> {
  pub fn new(content: Vec<T>, request: PageRequest, total: u64) -> Self {
    Self {
      content,
      page_number: request.page_number(),
      total_pages: total_pages(total, request.page_size()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::{PageRequest, total_pages};

  #[test]
  fn parameters_normalise_to_at_least_one() {
    let req = PageRequest::new(0, 0);
    assert_eq!(req.page_size(), 1);
    assert_eq!(req.page_number(), 1);
    assert_eq!(req.offset(), 0);
  }

  #[test]
  fn offset_is_zero_based() {
    assert_eq!(PageRequest::new(15, 1).offset(), 0);
    assert_eq!(PageRequest::new(15, 2).offset(), 15);
    assert_eq!(PageRequest::new(3, 4).offset(), 9);
  }

  #[test]
  fn total_pages_is_ceiling_division() {
    assert_eq!(total_pages(0, 15), 1);
    assert_eq!(total_pages(1, 15), 1);
    assert_eq!(total_pages(15, 15), 1);
    assert_eq!(total_pages(16, 15), 2);
    assert_eq!(total_pages(31, 15), 3);
  }

  #[test]
  fn total_pages_tolerates_zero_page_size() {
    assert_eq!(total_pages(7, 0), 7);
  }

  #[test]
  fn slice_selects_the_requested_page() {
    let items = [1, 2, 3, 4, 5];
    assert_eq!(PageRequest::new(2, 1).slice(&items), &[1, 2]);
    assert_eq!(PageRequest::new(2, 2).slice(&items), &[3, 4]);
    assert_eq!(PageRequest::new(2, 3).slice(&items), &[5]);
  }

  #[test]
  fn slice_past_the_end_is_empty() {
    let items = [1, 2, 3];
    assert!(PageRequest::new(2, 5).slice(&items).is_empty());
    assert!(PageRequest::new(2, 1).slice(&[] as &[i32]).is_empty());
  }
}
