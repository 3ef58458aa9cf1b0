/// API path prefix
pub const API_PREFIX: &str = "/api";

/// Filter criterion key that triggers free-text search instead of an exact match
pub const SEARCH_KEY: &str = "search";

/// Status assigned to imported records that carry none
pub const DEFAULT_STATUS: &str = "Active";

/// Upper bound on identifier and hostname length
pub const MAX_ID_LEN: usize = 15;
pub const MAX_HOSTNAME_LEN: usize = 15;
