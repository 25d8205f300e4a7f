//! Sample registrations and envelopes.

use mesh_protocol::agent_models::AgentRegistration;
use serde_json::{json, Value};

/// The echo agent used across the directory tests.
#[allow(dead_code)]
pub fn echo_registration() -> AgentRegistration {
    AgentRegistration::new(
        "echo-agent",
        "Echo Agent",
        vec!["echo".to_string(), "ping".to_string()],
        "http://localhost:9001",
    )
}

/// A raw `a2a/task` envelope body.
#[allow(dead_code)]
pub fn task_body(id: &str, action: &str, input: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "a2a/task",
        "params": {
            "taskId": format!("task-{id}"),
            "action": action,
            "sender": "tester",
            "input": input
        }
    })
}

#[allow(dead_code)]
pub fn caps(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
}
