//! stdio transport over in-memory pipes

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use unifi_mcp::config::ClientConfig;
use unifi_mcp::mcp::{ErrorCode, McpServer, serve_stream};
use unifi_mcp::tools::{Dispatcher, ToolContext, standard_registry};
use unifi_mcp::unifi::MockBackend;

fn server(mock: &Arc<MockBackend>, cancel: &CancellationToken) -> Arc<McpServer> {
    let config = ClientConfig {
        base_url: "https://192.168.1.1".to_string(),
        api_key: "test-key".to_string(),
        skip_tls_verify: false,
        timeout: Duration::from_secs(30),
    };
    let context = Arc::new(ToolContext::new(&config, mock.clone(), cancel.clone()));
    let dispatcher = Dispatcher::new(standard_registry(false).unwrap(), context);
    Arc::new(McpServer::new(Arc::new(dispatcher)))
}

/// Feed `input` to a session, wait for EOF handling, return every output line
async fn run_session(mock: &Arc<MockBackend>, input: &str) -> Vec<Value> {
    let cancel = CancellationToken::new();
    let (writer, mut output) = tokio::io::duplex(1 << 20);

    serve_stream(server(mock, &cancel), input.as_bytes(), writer, cancel)
        .await
        .unwrap();

    let mut text = String::new();
    output.read_to_string(&mut text).await.unwrap();
    text.lines().map(|line| serde_json::from_str(line).unwrap()).collect()
}

fn by_id(responses: Vec<Value>) -> HashMap<String, Value> {
    responses.into_iter().map(|r| (r["id"].to_string(), r)).collect()
}

#[tokio::test]
async fn handshake_and_listing() {
    let mock = Arc::new(MockBackend::new());
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18"}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
    );

    let responses = by_id(run_session(&mock, input).await);

    // The notification produced nothing
    assert_eq!(responses.len(), 2);
    assert_eq!(responses["1"]["result"]["protocolVersion"], "2025-06-18");
    let tools = responses["2"]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 30);
}

#[tokio::test]
async fn malformed_line_does_not_end_the_session() {
    let mock = Arc::new(MockBackend::new());
    let input = "this is not json\n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n";

    let responses = run_session(&mock, input).await;

    assert_eq!(responses.len(), 2);
    let parse_error = responses.iter().find(|r| r["id"].is_null()).unwrap();
    assert_eq!(parse_error["error"]["code"], ErrorCode::PARSE_ERROR);
    let pong = responses.iter().find(|r| r["id"] == 7).unwrap();
    assert_eq!(pong["result"], json!({}));
}

#[tokio::test]
async fn tool_calls_complete_before_eof_returns() {
    let mock = Arc::new(MockBackend::new());
    mock.respond(
        Method::GET,
        "/proxy/protect/integration/v1/cameras",
        200,
        json!([{"id": "c1", "name": "Porch"}]),
    );
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"get_protect_cameras"}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":"b","method":"tools/call","params":{"name":"get_camera_detailed","arguments":{}}}"#,
    );

    let responses = by_id(run_session(&mock, input).await);

    let listing = &responses["\"a\""]["result"];
    assert_eq!(listing["isError"], false);
    assert_eq!(listing["structuredContent"]["count"], 1);

    let detail = &responses["\"b\""]["result"];
    assert_eq!(detail["isError"], true);
    assert_eq!(detail["content"][0]["text"], "camera_id is required");
}

#[tokio::test]
async fn cancellation_stops_reading() {
    let mock = Arc::new(MockBackend::new());
    let cancel = CancellationToken::new();
    let (mut input, reader) = tokio::io::duplex(4096);
    let (writer, mut output) = tokio::io::duplex(1 << 16);

    let session = tokio::spawn(serve_stream(server(&mock, &cancel), reader, writer, cancel.clone()));

    input
        .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n")
        .await
        .unwrap();

    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    while byte[0] != b'\n' {
        output.read_exact(&mut byte).await.unwrap();
        line.push(byte[0]);
    }
    let pong: Value = serde_json::from_slice(&line).unwrap();
    assert_eq!(pong["id"], 1);

    // The input stays open; only the token ends the session
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), session)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}
