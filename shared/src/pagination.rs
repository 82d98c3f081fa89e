use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageStep {
    Prev,
    Next,
}

/// 1-based page cursor over the garage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    limit: usize,
    total_count: usize,
}

impl Pagination {
    pub fn new(limit: usize) -> Self {
        Self {
            current_page: 1,
            limit: limit.max(1),
            total_count: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.limit)
    }

    pub fn has_next(&self) -> bool {
        self.current_page * self.limit < self.total_count
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Records a fresh total; pulls the cursor back if the last page vanished.
    pub fn set_total(&mut self, total_count: usize) {
        self.total_count = total_count;
        let last = self.total_pages().max(1);
        if self.current_page > last {
            self.current_page = last;
        }
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Jumps straight to `page`; the next `set_total` clamps it if too far.
    pub fn jump_to(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub fn step(&mut self, step: PageStep) -> bool {
        match step {
            PageStep::Prev => self.prev_page(),
            PageStep::Next => self.next_page(),
        }
    }

    pub fn label(&self) -> String {
        format!("Page #{} from {}", self.current_page, self.total_pages())
    }
}
