use serde::{Deserialize, Serialize};

/// Action value that turns a routing rule into a reject rule.
pub const REJECT_ACTION: &str = "reject";

/// Per-domain routing rule.
///
/// Routes queries for a domain (and all of its subdomains) either to a named
/// upstream pool or to rejection. Examples:
/// - `{ domain = "home.lan", action = "lan" }` forwards `*.home.lan` to the
///   `lan` pool
/// - `{ domain = "ads.example", action = "reject" }` answers with an empty
///   response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteRule {
    /// Matches both the exact domain and all subdomains (*.domain)
    pub domain: String,

    /// `"reject"` or the name of an upstream pool
    pub action: String,

    /// Optional: restrict the rule to these record types (e.g. ["A", "AAAA"])
    #[serde(default)]
    pub record_types: Option<Vec<String>>,
}

impl RouteRule {
    /// Matches both exact domain and all subdomains.
    /// - Rule "home.lan" matches: "home.lan", "nas.home.lan"
    /// - Rule "home.lan" does NOT match: "otherhome.lan"
    ///
    pub fn matches_domain(&self, query_domain: &str) -> bool {
        let query_lower = query_domain.trim_end_matches('.').to_ascii_lowercase();
        let rule_lower = self.domain.trim_end_matches('.').to_ascii_lowercase();

        if query_lower == rule_lower {
            return true;
        }

        query_lower.ends_with(&format!(".{}", rule_lower))
    }

    pub fn matches_record_type(&self, record_type: &str) -> bool {
        match &self.record_types {
            None => true,
            Some(types) => types.iter().any(|t| t.eq_ignore_ascii_case(record_type)),
        }
    }

    pub fn matches(&self, query_domain: &str, record_type: &str) -> bool {
        self.matches_domain(query_domain) && self.matches_record_type(record_type)
    }

    pub fn is_reject(&self) -> bool {
        self.action.eq_ignore_ascii_case(REJECT_ACTION)
    }
}
