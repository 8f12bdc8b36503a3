//! Table-of-contents page prediction.
//!
//! The estimate is computed before rendering and is intentionally coarse: a
//! TOC page holds 15 entries and a body page is assumed to hold 3 policies.
//! It is only used for the page numbers printed in the TOC. The footer page
//! numbers come from the renderer's real text flow and may differ.

use crate::grouping::CategoryGroups;
use crate::types::PolicyCategory;
use log::debug;

/// TOC rows assumed to fit on one page.
pub const TOC_ENTRIES_PER_PAGE: usize = 15;

/// Policies assumed to fit on one body page.
pub const POLICIES_PER_PAGE: usize = 3;

/// Predicted 1-based starting page per category, in group order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEstimate {
    starts: Vec<(PolicyCategory, u32)>,
    toc_pages: u32,
    next_page: u32,
    include_index: bool,
}

impl PageEstimate {
    /// Estimate from grouped policies.
    #[must_use]
    pub fn from_groups(groups: &CategoryGroups<'_>, include_toc: bool, include_index: bool) -> Self {
        Self::from_sizes(&groups.sizes(), include_toc, include_index)
    }

    /// Estimate from `(category, group size)` pairs in group order.
    #[must_use]
    pub fn from_sizes(
        sizes: &[(PolicyCategory, usize)],
        include_toc: bool,
        include_index: bool,
    ) -> Self {
        // page 1 is the cover
        let mut page: u32 = 1;
        page += 1;

        let toc_pages = if include_toc {
            pages_for(sizes.len(), TOC_ENTRIES_PER_PAGE)
        } else {
            0
        };
        page += toc_pages;

        let mut starts = Vec::with_capacity(sizes.len());
        for &(category, size) in sizes {
            starts.push((category, page));
            page += pages_for(size, POLICIES_PER_PAGE);
        }

        debug!(
            "Estimated {} section starts, {toc_pages} TOC page(s), body ends before page {page}",
            starts.len()
        );

        Self {
            starts,
            toc_pages,
            next_page: page,
            include_index,
        }
    }

    /// Predicted starting page of `category`, if it has a section.
    #[must_use]
    pub fn start_of(&self, category: PolicyCategory) -> Option<u32> {
        self.starts
            .iter()
            .find(|(c, _)| *c == category)
            .map(|&(_, page)| page)
    }

    /// `(category, start page)` pairs in group order.
    #[inline]
    #[must_use]
    pub fn starts(&self) -> &[(PolicyCategory, u32)] {
        &self.starts
    }

    #[inline]
    #[must_use]
    pub const fn toc_pages(&self) -> u32 {
        self.toc_pages
    }

    /// Rough total page count, with one page allowed for the index.
    #[must_use]
    pub const fn estimated_page_count(&self) -> u32 {
        let index = if self.include_index { 1 } else { 0 };
        self.next_page - 1 + index
    }
}

fn pages_for(items: usize, per_page: usize) -> u32 {
    u32::try_from(items.div_ceil(per_page)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_category_with_toc() {
        let estimate = PageEstimate::from_sizes(&[(PolicyCategory::Officiating, 4)], true, false);
        assert_eq!(estimate.start_of(PolicyCategory::Officiating), Some(3));
        assert_eq!(estimate.toc_pages(), 1);
        assert_eq!(estimate.estimated_page_count(), 4);
    }

    #[test]
    fn test_without_toc_body_starts_on_page_two() {
        let estimate = PageEstimate::from_sizes(
            &[
                (PolicyCategory::Governance, 3),
                (PolicyCategory::Eligibility, 4),
            ],
            false,
            true,
        );
        assert_eq!(
            estimate.starts(),
            &[
                (PolicyCategory::Governance, 2),
                (PolicyCategory::Eligibility, 3)
            ]
        );
        // cover + 1 + 2 body pages + index
        assert_eq!(estimate.estimated_page_count(), 5);
    }

    #[test]
    fn test_sixteen_categories_need_two_toc_pages() {
        let sizes: Vec<_> = PolicyCategory::ALL[..16].iter().map(|&c| (c, 1)).collect();
        let estimate = PageEstimate::from_sizes(&sizes, true, false);
        assert_eq!(estimate.toc_pages(), 2);
        assert_eq!(estimate.starts()[0].1, 4);
        assert_eq!(estimate.starts()[15].1, 19);
    }

    #[test]
    fn test_empty_group_takes_no_pages() {
        let estimate = PageEstimate::from_sizes(
            &[
                (PolicyCategory::Governance, 0),
                (PolicyCategory::Eligibility, 1),
            ],
            true,
            false,
        );
        assert_eq!(estimate.start_of(PolicyCategory::Governance), Some(3));
        assert_eq!(estimate.start_of(PolicyCategory::Eligibility), Some(3));
        assert!(estimate.start_of(PolicyCategory::Officiating).is_none());
    }
}
