/// Limit and offset of a query.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub(crate) maybe_limit: Option<u64>,
    pub(crate) maybe_offset: Option<u64>,
}

impl Paginator {
    /// Non-positive limits are ignored.
    pub fn limit(&mut self, limit: i64) {
        if limit > 0 {
            self.maybe_limit = Some(limit as u64);
        }
    }

    /// Negative offsets clamp to zero.
    pub fn offset(&mut self, offset: i64) {
        self.maybe_offset = Some(offset.max(0) as u64);
    }

    /// Pages start at 1.
    pub fn for_page(&mut self, page: i64, per_page: i64) {
        let page = page.max(1);
        self.offset((page - 1).saturating_mul(per_page));
        self.limit(per_page);
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.maybe_limit
    }

    pub fn get_offset(&self) -> Option<u64> {
        self.maybe_offset
    }
}
