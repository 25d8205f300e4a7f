//! Capability-based discovery.
//!
//! An agent matches a query when its capability set and the wanted set
//! share at least one tag. Matches are returned in registry order; no
//! ranking is applied. Callers that want a "best" match can score the
//! returned records with [`match_count`].

use crate::registry::error::{RegistryError, RegistryResult};
use mesh_protocol::AgentRecord;
use std::collections::HashSet;

/// Returns true if `record` advertises any of the `wanted` capabilities.
pub fn matches(record: &AgentRecord, wanted: &HashSet<&str>) -> bool {
    record
        .capabilities
        .iter()
        .any(|cap| wanted.contains(cap.as_str()))
}

/// Number of distinct wanted capabilities the record advertises.
pub fn match_count(record: &AgentRecord, wanted: &[String]) -> usize {
    let advertised: HashSet<&str> = record.capabilities.iter().map(String::as_str).collect();
    wanted
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(&advertised)
        .count()
}

/// Filter `records` down to those matching `wanted`, preserving order.
///
/// # Errors
///
/// Returns `RegistryError::Validation` if `wanted` is empty.
pub fn discover<'a, I>(records: I, wanted: &[String]) -> RegistryResult<Vec<AgentRecord>>
where
    I: IntoIterator<Item = &'a AgentRecord>,
{
    if wanted.is_empty() {
        return Err(RegistryError::Validation(
            "No capabilities specified".to_string(),
        ));
    }

    let wanted: HashSet<&str> = wanted.iter().map(String::as_str).collect();
    Ok(records
        .into_iter()
        .filter(|record| matches(record, &wanted))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str, caps: &[&str]) -> AgentRecord {
        AgentRecord {
            agent_id: id.to_string(),
            name: id.to_string(),
            capabilities: caps.iter().map(|c| c.to_string()).collect(),
            endpoint: format!("http://localhost/{id}"),
            registered_at: Utc::now(),
        }
    }

    fn wanted(caps: &[&str]) -> Vec<String> {
        caps.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_discover_union_semantics() {
        let records = vec![
            record("a", &["search", "summarize"]),
            record("b", &["code"]),
            record("c", &["summarize", "translate"]),
        ];

        let found = discover(&records, &wanted(&["summarize", "code"])).unwrap();
        let ids: Vec<_> = found.iter().map(|r| r.agent_id.as_str()).collect();

        // Registry order, not match-count order
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_discover_no_match_is_empty() {
        let records = vec![record("a", &["search"])];
        let found = discover(&records, &wanted(&["code"])).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_discover_empty_query_rejected() {
        let records = vec![record("a", &["search"])];
        let result = discover(&records, &[]);
        assert!(matches!(result, Err(RegistryError::Validation(_))));
    }

    #[test]
    fn test_match_count() {
        let r = record("a", &["search", "summarize", "translate"]);
        assert_eq!(match_count(&r, &wanted(&["search", "translate", "code"])), 2);
        assert_eq!(match_count(&r, &wanted(&["search", "search"])), 1);
        assert_eq!(match_count(&r, &wanted(&["code"])), 0);
    }
}
