use ferrous_relay_application::ports::Router;
use ferrous_relay_domain::config::RouteRule;
use ferrous_relay_domain::{DnsQuery, DomainError, RouteDecision, UpstreamSelection};
use std::sync::Arc;
use tracing::debug;

/// Ordered list of suffix rules; the first match decides.
///
/// Queries that match no rule go to the default pool. Without one they are
/// a routing error.
pub struct RuleRouter {
    rules: Vec<CompiledRule>,
    default_pool: Option<UpstreamSelection>,
}

struct CompiledRule {
    rule: RouteRule,
    decision: RouteDecision,
}

impl RuleRouter {
    pub fn new(rules: Vec<RouteRule>, default_pool: Option<&str>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let decision = if rule.is_reject() {
                    RouteDecision::Reject
                } else {
                    RouteDecision::Forward(UpstreamSelection::new(Arc::from(rule.action.as_str())))
                };
                CompiledRule { rule, decision }
            })
            .collect();

        Self {
            rules,
            default_pool: default_pool.map(UpstreamSelection::new),
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Router for RuleRouter {
    fn select(&self, query: &DnsQuery) -> Result<RouteDecision, DomainError> {
        let record_type = query.record_type.to_string();

        if let Some(compiled) = self
            .rules
            .iter()
            .find(|c| c.rule.matches(&query.domain, &record_type))
        {
            debug!(
                domain = %query.domain,
                rule = %compiled.rule.domain,
                action = %compiled.rule.action,
                "Routing rule matched"
            );
            return Ok(compiled.decision.clone());
        }

        self.default_pool
            .clone()
            .map(RouteDecision::Forward)
            .ok_or_else(|| {
                DomainError::RoutingFailed(format!(
                    "no rule or default pool for {}",
                    query.domain
                ))
            })
    }
}
