#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};

pub type ToolResponder = Box<dyn Fn(&str, &Value) -> Value + Send + Sync>;

/// In-process MCP server speaking the JSON-RPC wire shape over HTTP POST.
/// Records every request body for assertions.
pub struct ServerState {
    tools: Value,
    responder: ToolResponder,
    requests: Mutex<Vec<Value>>,
}

impl ServerState {
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count_method(&self, method: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request["method"] == method)
            .count()
    }

    pub fn tool_invocations(&self) -> Vec<(String, Value)> {
        self.requests()
            .iter()
            .filter(|request| request["method"] == "tools/call")
            .map(|request| {
                (
                    request["params"]["name"].as_str().unwrap_or_default().to_string(),
                    request["params"]["arguments"].clone(),
                )
            })
            .collect()
    }
}

pub struct MockServer {
    pub url: String,
    pub state: Arc<ServerState>,
}

pub fn default_tools() -> Value {
    json!([
        {
            "name": "search_products",
            "description": "Search products by name or category",
            "inputSchema": {
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"]
            }
        },
        {
            "name": "get_customer",
            "description": "Look up a customer by id"
        },
        {
            "name": "create_order",
            "description": "Create an order for a customer",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "customer_id": { "type": "integer" },
                    "product_id": { "type": "integer" },
                    "quantity": { "type": "integer" }
                },
                "required": ["customer_id", "product_id"]
            }
        }
    ])
}

/// Shorthand for the standard single-text-item tool result.
pub fn text_result(text: &str) -> Value {
    json!({ "result": { "content": [ { "type": "text", "text": text } ] } })
}

pub async fn spawn(
    responder: impl Fn(&str, &Value) -> Value + Send + Sync + 'static,
) -> MockServer {
    spawn_with_tools(default_tools(), responder).await
}

pub async fn spawn_with_tools(
    tools: Value,
    responder: impl Fn(&str, &Value) -> Value + Send + Sync + 'static,
) -> MockServer {
    let state = Arc::new(ServerState {
        tools,
        responder: Box::new(responder),
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/rpc", post(handle_rpc))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer {
        url: format!("http://{addr}/rpc"),
        state,
    }
}

async fn handle_rpc(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<Value>,
) -> Json<Value> {
    state.requests.lock().unwrap().push(request.clone());

    let id = request["id"].clone();
    match request["method"].as_str().unwrap_or_default() {
        "initialize" => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "protocolVersion": "2024-11-05",
                "capabilities": { "tools": {} },
                "serverInfo": { "name": "mock-mcp", "version": "0.1.0" }
            }
        })),
        "notifications/initialized" => Json(Value::Null),
        "tools/list" => {
            // A null tool set stands for a server whose result has no
            // `tools` key at all.
            let result = if state.tools.is_null() {
                json!({})
            } else {
                json!({ "tools": state.tools })
            };
            Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
        }
        "tools/call" => {
            let name = request["params"]["name"].as_str().unwrap_or_default();
            let arguments = &request["params"]["arguments"];
            let mut body = (state.responder)(name, arguments);
            body["jsonrpc"] = json!("2.0");
            body["id"] = id;
            Json(body)
        }
        other => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": format!("Method not found: {other}") }
        })),
    }
}
