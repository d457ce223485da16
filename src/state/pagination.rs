//! Pagination state for the ticket list

/// Rows-per-page choices, cycled from the list view
pub const ROWS_PER_PAGE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Zero-based page cursor over a server-side total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub rows_per_page: usize,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::with_rows_per_page(ROWS_PER_PAGE_OPTIONS[0])
    }
}

impl Pagination {
    pub fn with_rows_per_page(rows_per_page: usize) -> Self {
        Self {
            page: 0,
            rows_per_page: rows_per_page.max(1),
            total: 0,
        }
    }

    /// Number of pages (at least one, even when empty)
    pub fn page_count(&self) -> usize {
        let total = self.total as usize;
        total.div_ceil(self.rows_per_page).max(1)
    }

    /// Record the total reported by the server, pulling the page back in range.
    ///
    /// Returns true when the page had to move.
    pub fn set_total(&mut self, total: u64) -> bool {
        self.total = total;
        let page = self.page.min(self.page_count() - 1);
        let moved = page != self.page;
        self.page = page;
        moved
    }

    /// Advance one page; returns true when the page changed
    pub fn next_page(&mut self) -> bool {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page; returns true when the page changed
    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    /// Switch to the next rows-per-page option and restart from the first page
    pub fn cycle_rows_per_page(&mut self) {
        let next = ROWS_PER_PAGE_OPTIONS
            .iter()
            .position(|&n| n == self.rows_per_page)
            .map(|i| ROWS_PER_PAGE_OPTIONS[(i + 1) % ROWS_PER_PAGE_OPTIONS.len()])
            .unwrap_or(ROWS_PER_PAGE_OPTIONS[0]);
        self.rows_per_page = next;
        self.page = 0;
    }

    /// "11-20 of 45" style label
    pub fn range_label(&self) -> String {
        if self.total == 0 {
            return "0 of 0".to_string();
        }
        let start = self.page * self.rows_per_page + 1;
        let end = ((self.page + 1) * self.rows_per_page).min(self.total as usize);
        format!("{}-{} of {}", start, end, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first_page_of_ten() {
        let p = Pagination::default();
        assert_eq!(p.page, 0);
        assert_eq!(p.rows_per_page, 10);
        assert_eq!(p.page_count(), 1);
    }

    #[test]
    fn test_page_count_rounds_up() {
        let mut p = Pagination::default();
        p.set_total(45);
        assert_eq!(p.page_count(), 5);
        p.set_total(50);
        assert_eq!(p.page_count(), 5);
    }

    #[test]
    fn test_set_total_reports_when_page_moves() {
        let mut p = Pagination::default();
        p.set_total(25);
        p.next_page();
        p.next_page();
        assert!(p.set_total(20));
        assert_eq!(p.page, 1);
        assert!(!p.set_total(20));
    }

    #[test]
    fn test_next_page_stops_at_last() {
        let mut p = Pagination::default();
        p.set_total(25);
        assert!(p.next_page());
        assert!(p.next_page());
        assert!(!p.next_page());
        assert_eq!(p.page, 2);
    }

    #[test]
    fn test_prev_page_stops_at_first() {
        let mut p = Pagination::default();
        assert!(!p.prev_page());
        p.set_total(30);
        p.next_page();
        assert!(p.prev_page());
        assert_eq!(p.page, 0);
    }

    #[test]
    fn test_cycle_rows_resets_page() {
        let mut p = Pagination::default();
        p.set_total(100);
        p.next_page();
        p.cycle_rows_per_page();
        assert_eq!(p.rows_per_page, 25);
        assert_eq!(p.page, 0);
        p.cycle_rows_per_page();
        p.cycle_rows_per_page();
        p.cycle_rows_per_page();
        assert_eq!(p.rows_per_page, 10);
    }

    #[test]
    fn test_unknown_rows_per_page_cycles_to_first_option() {
        let mut p = Pagination::with_rows_per_page(7);
        p.cycle_rows_per_page();
        assert_eq!(p.rows_per_page, 10);
    }

    #[test]
    fn test_shrinking_total_pulls_page_back() {
        let mut p = Pagination::default();
        p.set_total(100);
        for _ in 0..5 {
            p.next_page();
        }
        p.set_total(12);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn test_range_label() {
        let mut p = Pagination::default();
        assert_eq!(p.range_label(), "0 of 0");
        p.set_total(45);
        p.next_page();
        assert_eq!(p.range_label(), "11-20 of 45");
        for _ in 0..3 {
            p.next_page();
        }
        assert_eq!(p.range_label(), "41-45 of 45");
    }
}
