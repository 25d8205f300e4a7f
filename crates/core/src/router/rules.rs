//! Keyword routing table.
//!
//! Rules are evaluated in order and the first match wins. Within a rule the
//! action is checked before the stringified input, so a rule's input
//! keywords only apply when its action keywords missed.

use serde_json::Value;

/// Backend agent a task is routed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    /// Id passed to the backend as `{agent}`.
    pub agent_id: String,

    /// Display name, used in logs.
    pub name: String,
}

impl RouteTarget {
    pub fn new(agent_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
        }
    }
}

/// One category of the routing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRule {
    pub target: RouteTarget,

    /// Lowercase substrings looked for in the action.
    pub action_keywords: Vec<String>,

    /// Lowercase substrings looked for in the compact JSON of the input.
    pub input_keywords: Vec<String>,
}

impl RoutingRule {
    pub fn new(target: RouteTarget, action_keywords: &[&str], input_keywords: &[&str]) -> Self {
        Self {
            target,
            action_keywords: action_keywords.iter().map(|k| k.to_lowercase()).collect(),
            input_keywords: input_keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Check a lowercased action and input text against this rule.
    fn matches(&self, action: &str, input_text: &str) -> bool {
        self.action_keywords.iter().any(|k| action.contains(k.as_str()))
            || self.input_keywords.iter().any(|k| input_text.contains(k.as_str()))
    }
}

/// Ordered rules plus the target used when none match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    rules: Vec<RoutingRule>,
    fallback: RouteTarget,
}

impl RoutingTable {
    pub fn new(rules: Vec<RoutingRule>, fallback: RouteTarget) -> Self {
        Self { rules, fallback }
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &RouteTarget {
        &self.fallback
    }

    /// Pick the target for a task. Matching is case-insensitive.
    pub fn classify(&self, action: &str, input: &Value) -> &RouteTarget {
        let action = action.to_lowercase();
        let input_text = input.to_string().to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&action, &input_text))
            .map(|rule| &rule.target)
            .unwrap_or(&self.fallback)
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        let researcher = RouteTarget::new("researcher", "Researcher");
        Self::new(
            vec![
                RoutingRule::new(
                    RouteTarget::new("code", "Code Agent"),
                    &["code", "program", "implement", "build", "function"],
                    &["code", "program"],
                ),
                RoutingRule::new(
                    RouteTarget::new("data", "Data Agent"),
                    &["data", "analyze", "analytics", "query", "stats"],
                    &["analyze", "analytics", "data"],
                ),
                RoutingRule::new(
                    RouteTarget::new("api", "API Agent"),
                    &["api", "integration", "webhook", "connect"],
                    &[],
                ),
                RoutingRule::new(
                    researcher.clone(),
                    &["research", "search", "find"],
                    &["research", "find"],
                ),
                RoutingRule::new(
                    RouteTarget::new("writer", "Writer"),
                    &["write", "document", "draft", "edit", "create"],
                    &["write", "document"],
                ),
            ],
            researcher,
        )
    }
}
