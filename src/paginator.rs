#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    pub fn shows_controls(&self, total: usize) -> bool {
        total > self.page_size
    }

    pub fn page<'a, T>(&self, items: &'a [T], index: usize) -> &'a [T] {
        let start = index.saturating_sub(1).saturating_mul(self.page_size).min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }

    pub fn current<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        self.page(items, self.current_page)
    }

    pub fn next(&mut self, total: usize) -> bool {
        if self.current_page.saturating_mul(self.page_size) < total {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_to(&mut self, page: usize, total: usize) -> usize {
        self.current_page = page;
        self.clamp(total)
    }

    pub fn clamp(&mut self, total: usize) -> usize {
        let last = self.page_count(total).max(1);
        self.current_page = self.current_page.clamp(1, last);
        self.current_page
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}
