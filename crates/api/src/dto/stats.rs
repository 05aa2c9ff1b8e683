use serde::Serialize;

#[derive(Serialize, Debug, Clone, Default)]
pub struct StatsResponse {
    pub uptime_secs: u64,
    pub cache: CacheStats,
    pub admission: AdmissionStats,
    pub coalescer: CoalescerStats,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub refreshes: u64,
    pub removals: u64,
    pub hit_rate: f64,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct AdmissionStats {
    pub in_flight: usize,
    pub ceiling: usize,
    pub denied: u64,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct CoalescerStats {
    pub in_flight: usize,
    pub executions: u64,
    pub joins: u64,
}
