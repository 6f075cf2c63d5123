//! Configuration options for traversal behavior

// ============================================================================
// Traversal Config
// ============================================================================

/// Configuration options for one top-level validation call
///
/// The default imposes no limits: nesting depth is bounded only by the
/// call stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraversalConfig {
    /// Maximum container nesting depth (`None` = unbounded)
    pub max_depth: Option<usize>,
}

impl TraversalConfig {
    /// Create a new traversal config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap container nesting depth
    ///
    /// A container entered below this depth fails with
    /// `FailureCode::DepthExceeded` instead of being descended into.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Remove the depth cap
    pub fn unbounded(mut self) -> Self {
        self.max_depth = None;
        self
    }
}
