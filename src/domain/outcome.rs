/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// New content (HTTP 200)
    Fresh(Vec<u8>),
    /// Content not modified (HTTP 304), served from the response cache
    Cached(Vec<u8>),
}

impl FetchOutcome {
    pub fn body(&self) -> &[u8] {
        match self {
            FetchOutcome::Fresh(body) | FetchOutcome::Cached(body) => body,
        }
    }

    pub fn into_body(self) -> Vec<u8> {
        match self {
            FetchOutcome::Fresh(body) | FetchOutcome::Cached(body) => body,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, FetchOutcome::Cached(_))
    }
}
