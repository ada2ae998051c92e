/// Tuning knobs for a [`Reconciler`](crate::Reconciler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerOptions {
    /// Reuse a view removed earlier in the same cycle when its node is
    /// inserted again at another offset.
    pub reuse_moved_views: bool,
    /// Views kept per kind for later inserts. Zero disables pooling.
    pub pool_limit_per_kind: usize,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self {
            reuse_moved_views: true,
            pool_limit_per_kind: 8,
        }
    }
}

impl ReconcilerOptions {
    pub fn reuse_moved_views(mut self, enabled: bool) -> Self {
        self.reuse_moved_views = enabled;
        self
    }

    pub fn pool_limit_per_kind(mut self, limit: usize) -> Self {
        self.pool_limit_per_kind = limit;
        self
    }

    /// No moved-view reuse and no pooling: every insert builds a new view.
    pub fn without_reuse() -> Self {
        Self {
            reuse_moved_views: false,
            pool_limit_per_kind: 0,
        }
    }
}
