//! Spawning real axum services on ephemeral ports.

use mesh_core::directory::DirectoryService;
use mesh_core::registry::RegistryStore;
use mesh_core::router::TaskRouter;
use mesh_core::server::AgentServer;
use std::sync::Arc;
use tokio::net::TcpListener;

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    (listener, format!("http://{addr}"))
}

/// Start a directory service and return its base URL and store.
#[allow(dead_code)]
pub async fn spawn_directory() -> (String, Arc<RegistryStore>) {
    let (listener, url) = bind().await;
    let store = Arc::new(RegistryStore::new());
    let service = DirectoryService::new(Arc::clone(&store));
    tokio::spawn(service.serve(listener));
    (url, store)
}

/// Start an agent server and return the URL it actually answers on.
#[allow(dead_code)]
pub async fn spawn_agent(server: AgentServer) -> String {
    let (listener, url) = bind().await;
    tokio::spawn(async move { server.serve(listener).await });
    url
}

/// Start a task router gateway and return its URL.
#[allow(dead_code)]
pub async fn spawn_bridge(router: TaskRouter) -> String {
    let (listener, url) = bind().await;
    tokio::spawn(async move {
        router
            .serve_with_shutdown(listener, std::future::pending())
            .await
    });
    url
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn dead_endpoint() -> String {
    let (listener, url) = bind().await;
    drop(listener);
    url
}
