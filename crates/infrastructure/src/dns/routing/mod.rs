pub mod rule_router;

pub use rule_router::RuleRouter;
