use serde::Serialize;

/// One fresh cache entry as listed by `GET /api/cache`.
#[derive(Serialize, Debug, Clone)]
pub struct CacheEntryResponse {
    pub domain: String,
    pub record_type: String,
    pub rcode: String,
    /// Seconds until the entry stops being served from cache
    pub ttl_remaining: u32,
    pub answers: Vec<CacheRecordResponse>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CacheRecordResponse {
    pub name: String,
    pub record_type: String,
    pub ttl: u32,
    pub data: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
