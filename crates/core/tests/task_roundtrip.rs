//! Register, discover and deliver tasks between real agent processes.

mod common;

use common::*;
use mesh_core::client::{AgentClient, ClientError};
use mesh_core::server::{AgentServer, EchoHandler, HandlerError};
use mesh_protocol::agent_models::AgentRegistration;
use mesh_protocol::task_models::{error_codes, TaskStatus};
use serde_json::{json, Value};
use std::time::Duration;

/// Start an agent with `server`'s handler and register it under its real URL.
async fn start_and_register(directory: &str, server: AgentServer) -> AgentClient {
    let mut client = AgentClient::new(
        server.agent_id(),
        server.name(),
        server.capabilities().to_vec(),
        directory,
    );
    let endpoint = spawn_agent(server).await;
    client.register(&endpoint).await.unwrap();
    client
}

#[tokio::test]
async fn test_send_task_returns_handler_output_verbatim() {
    let (directory, _store) = spawn_directory().await;

    let server = AgentServer::new("calc", "Calculator", caps(&["math"]), 0);
    server.handle_task(|action: &str, input: &Value, sender: &str| -> Result<Value, HandlerError> {
        let a = input["a"].as_i64().unwrap_or(0);
        let b = input["b"].as_i64().unwrap_or(0);
        Ok(json!({ "action": action, "sum": a + b, "from": sender }))
    });
    let registered = start_and_register(&directory, server).await;
    assert!(registered.endpoint().is_some());

    let caller = AgentClient::new("caller", "Caller", caps(&["ask"]), directory.as_str());
    let target = caller.discover(&caps(&["math"])).await.unwrap().unwrap();
    assert_eq!(target.agent_id, "calc");

    let response = caller
        .send_task("calc", "add", json!({ "a": 2, "b": 3 }))
        .await
        .unwrap();
    assert!(response.correlation_id.is_some());

    let result = response.into_result().unwrap();
    assert_eq!(result.status, TaskStatus::Completed);
    assert_eq!(
        result.output,
        Some(json!({ "action": "add", "sum": 5, "from": "caller" }))
    );
}

#[tokio::test]
async fn test_echo_handler_over_http() {
    let (directory, _store) = spawn_directory().await;

    let server = AgentServer::new("echo-agent", "Echo Agent", caps(&["echo", "ping"]), 0);
    server.handle_task(EchoHandler);
    start_and_register(&directory, server).await;

    let caller = AgentClient::new("cli-sender", "CLI Sender", Vec::new(), directory.as_str());
    let output = caller
        .send_task("echo-agent", "ping", json!({ "n": 1 }))
        .await
        .unwrap()
        .into_result()
        .unwrap()
        .output;
    assert_eq!(
        output,
        Some(json!({
            "received_action": "ping",
            "received_input": { "n": 1 },
            "from": "cli-sender"
        }))
    );
}

#[tokio::test]
async fn test_unregistered_target_is_agent_not_found() {
    let (directory, _store) = spawn_directory().await;
    let caller = AgentClient::new("caller", "Caller", Vec::new(), directory.as_str());

    let error = caller.send_task("ghost", "x", json!({})).await.unwrap_err();
    match error {
        ClientError::AgentNotFound(id) => assert_eq!(id, "ghost"),
        other => panic!("Expected AgentNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dead_endpoint_is_transport_error() {
    let (directory, store) = spawn_directory().await;
    store
        .register(AgentRegistration::new("gone", "Gone", caps(&["x"]), dead_endpoint().await))
        .await
        .unwrap();

    let caller = AgentClient::new("caller", "Caller", Vec::new(), directory.as_str());
    let error = caller.send_task("gone", "x", json!({})).await.unwrap_err();
    assert!(matches!(error, ClientError::Transport(_)), "got {error:?}");
}

#[tokio::test]
async fn test_agent_without_handler_answers_32001() {
    let (directory, _store) = spawn_directory().await;
    start_and_register(&directory, AgentServer::new("idle", "Idle", caps(&["x"]), 0)).await;

    let caller = AgentClient::new("caller", "Caller", Vec::new(), directory.as_str());
    let error = caller
        .send_task("idle", "x", json!({}))
        .await
        .unwrap()
        .into_result()
        .unwrap_err();
    assert_eq!(error.code, error_codes::HANDLER_NOT_REGISTERED);
}

#[tokio::test]
async fn test_deadline_exceeded() {
    let (directory, _store) = spawn_directory().await;

    let server = AgentServer::new("slow", "Slow", caps(&["wait"]), 0);
    server.handle_task(|_: &str, _: &Value, _: &str| -> Result<Value, HandlerError> {
        std::thread::sleep(Duration::from_secs(2));
        Ok(json!("late"))
    });
    start_and_register(&directory, server).await;

    let caller = AgentClient::new("caller", "Caller", Vec::new(), directory.as_str());
    let error = caller
        .send_task_with_deadline("slow", "x", json!({}), Some(Duration::from_millis(200)))
        .await
        .unwrap_err();
    assert!(matches!(error, ClientError::Deadline(d) if d == Duration::from_millis(200)));
}

#[tokio::test]
async fn test_rejected_registration_carries_payload() {
    let (directory, store) = spawn_directory().await;

    let mut client = AgentClient::new("empty", "Empty", Vec::new(), directory.as_str());
    match client.register("http://localhost:1").await {
        Err(ClientError::Registration(payload)) => {
            let message = payload["error"].as_str().unwrap();
            assert!(message.contains("capabilities"));
        }
        other => panic!("Expected Registration error, got {other:?}"),
    }
    assert!(client.endpoint().is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_discover_all_and_list() {
    let (directory, _store) = spawn_directory().await;
    start_and_register(&directory, AgentServer::new("a", "A", caps(&["search"]), 0)).await;
    start_and_register(&directory, AgentServer::new("b", "B", caps(&["analyze", "search"]), 0)).await;
    start_and_register(&directory, AgentServer::new("c", "C", caps(&["write"]), 0)).await;

    let client = AgentClient::new("q", "Q", Vec::new(), directory.as_str());

    let found = client.discover_all(&caps(&["analyze", "search"])).await.unwrap();
    let ids: Vec<&str> = found.iter().map(|r| r.agent_id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);

    assert_eq!(client.list_agents().await.unwrap().len(), 3);
    assert!(client.discover(&caps(&["code"])).await.unwrap().is_none());

    let error = client.discover_all(&[]).await.unwrap_err();
    assert!(matches!(error, ClientError::Directory { status: 400, .. }));
}

#[tokio::test]
async fn test_agent_server_envelope_errors_over_http() {
    let server = AgentServer::new("e", "E", caps(&["x"]), 0);
    server.handle_task(EchoHandler);
    let endpoint = spawn_agent(server).await;
    let http = reqwest::Client::new();

    let body: Value = http
        .post(&endpoint)
        .json(&json!({ "jsonrpc": "2.0", "id": "c1", "method": "a2a/other", "params": {} }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["id"], "c1");
    assert_eq!(body["error"]["code"], error_codes::METHOD_NOT_FOUND);

    let response = http.post(&endpoint).body("nope").send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["error"]["code"], error_codes::PARSE_ERROR);

    let ok: Value = http
        .post(&endpoint)
        .json(&task_body("c2", "hello", json!({})))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ok["result"]["status"], "completed");
    assert_eq!(ok["result"]["taskId"], "task-c2");

    let missing = http.post(format!("{endpoint}/tasks")).send().await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_query_characters_in_id_do_not_resolve_other_agents() {
    let (directory, _store) = spawn_directory().await;
    let server = AgentServer::new("x", "X", caps(&["echo"]), 0);
    server.handle_task(EchoHandler);
    start_and_register(&directory, server).await;

    let caller = AgentClient::new("caller", "Caller", Vec::new(), directory.as_str());
    for id in ["x?y", "x#frag"] {
        match caller.get_agent(id).await {
            Err(ClientError::AgentNotFound(missing)) => assert_eq!(missing, id),
            other => panic!("Expected AgentNotFound for {id}, got {other:?}"),
        }
    }

    let error = caller.send_task("x?y", "ping", json!({})).await.unwrap_err();
    assert!(matches!(error, ClientError::AgentNotFound(ref id) if id == "x?y"), "got {error:?}");
    assert_eq!(caller.get_agent("x").await.unwrap().agent_id, "x");
}

#[tokio::test]
async fn test_id_with_slash_resolves_and_receives_tasks() {
    let (directory, store) = spawn_directory().await;
    let server = AgentServer::new("team/a", "Team A", caps(&["echo"]), 0);
    server.handle_task(EchoHandler);
    let endpoint = spawn_agent(server).await;
    store
        .register(AgentRegistration::new("team/a", "Team A", caps(&["echo"]), endpoint.as_str()))
        .await
        .unwrap();

    let caller = AgentClient::new("caller", "Caller", Vec::new(), directory.as_str());
    let record = caller.get_agent("team/a").await.unwrap();
    assert_eq!(record.agent_id, "team/a");
    assert_eq!(record.endpoint, endpoint);

    let result = caller
        .send_task("team/a", "ping", json!({}))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(result.status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_non_directory_404_is_directory_error() {
    let server = AgentServer::new("e", "E", caps(&["x"]), 0);
    let not_a_directory = spawn_agent(server).await;

    let client = AgentClient::new("q", "Q", Vec::new(), not_a_directory.as_str());
    match client.get_agent("anyone").await {
        Err(ClientError::Directory { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Unknown endpoint");
        }
        other => panic!("Expected Directory error, got {other:?}"),
    }

    let error = client.send_task("anyone", "x", json!({})).await.unwrap_err();
    assert!(matches!(error, ClientError::Directory { status: 404, .. }), "got {error:?}");
}
