// Regex match configuration.

/// Default search stack bound of the regex matcher.
///
/// Every consumed character and every epsilon step costs one frame. Frames
/// live on the heap, so the bound only caps memory use.
pub const DEFAULT_MAX_DEPTH: usize = 1 << 20;

/// Options controlling the backtracking regex matcher.
///
/// Neither option changes which match is reported for patterns the
/// unbounded search can finish: `memoize` only avoids recomputing a
/// `(state, position)` result, and `max_depth` reports a search whose path
/// grows past it as [`FstError::DepthExceeded`](crate::FstError::DepthExceeded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Cache sub-results per `(state, position, at_start)`.
    pub memoize: bool,
    /// Maximum number of search frames of a single match attempt.
    pub max_depth: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            memoize: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MatchConfig {
    /// Plain exhaustive backtracking without a result cache.
    pub fn unmemoized() -> Self {
        Self {
            memoize: false,
            ..Self::default()
        }
    }

    /// Builder-style depth limit setter.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
