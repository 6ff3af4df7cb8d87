//! Shared utilities for integration testing.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use stellarpulse::chain::envelope::TransactionEnvelope;
use stellarpulse::config::ClientConfig;
use stellarpulse::wallet::{WalletAdapter, WalletError};

/// What a scripted RPC handler answers with.
pub enum RpcReply {
    /// JSON-RPC `result` member.
    Result(Value),
    /// JSON-RPC `error` member.
    Error { code: i64, message: String },
}

/// An in-process JSON-RPC server that records every call it serves.
pub struct MockRpcServer {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockRpcServer {
    /// Method names in the order they were served.
    pub fn methods(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }

    /// Params recorded for every call of `method`.
    pub fn params_of(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Start a mock JSON-RPC server whose behavior is scripted by `handler`.
pub async fn start_mock_rpc<F>(handler: F) -> MockRpcServer
where
    F: Fn(&str, &Value) -> RpcReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls: Arc<Mutex<Vec<(String, Value)>>> = Arc::new(Mutex::new(Vec::new()));

    let recorded = Arc::clone(&calls);
    let handler = Arc::new(handler);
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let recorded = Arc::clone(&recorded);
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                let Some(request) = read_http_request(&mut socket).await else {
                    return;
                };

                let method = request["method"].as_str().unwrap_or_default().to_string();
                let params = request.get("params").cloned().unwrap_or(Value::Null);
                recorded.lock().unwrap().push((method.clone(), params.clone()));

                let body = match handler(&method, &params) {
                    RpcReply::Result(result) => json!({
                        "jsonrpc": "2.0",
                        "id": request.get("id").cloned().unwrap_or(Value::Null),
                        "result": result,
                    }),
                    RpcReply::Error { code, message } => json!({
                        "jsonrpc": "2.0",
                        "id": request.get("id").cloned().unwrap_or(Value::Null),
                        "error": { "code": code, "message": message },
                    }),
                };
                let body = body.to_string();
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockRpcServer { addr, calls }
}

/// Read one HTTP request from the socket and parse its JSON body.
async fn read_http_request(socket: &mut tokio::net::TcpStream) -> Option<Value> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length: usize = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse().ok())?;

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    serde_json::from_slice(&buf[body_start..body_start + content_length]).ok()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Client configuration pointed at the mock server, with fast polling.
pub fn test_config(rpc_url: &str) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.network.rpc_url = rpc_url.to_string();
    config.network.rpc_timeout_secs = 2;
    config.polling.confirmation_interval_ms = 50;
    config.polling.confirmation_timeout_secs = 5;
    config.polling.post_donation_grace_secs = 0;
    config.wallet.reconnect_delay_ms = 0;
    config
}

/// Scripted wallet used by the flow tests: signs by appending a marker
/// signature to the envelope it is handed.
pub struct SigningWallet {
    pub public_key: String,
}

impl WalletAdapter for SigningWallet {
    async fn is_installed(&self) -> Result<bool, WalletError> {
        Ok(true)
    }

    async fn is_allowed(&self) -> Result<bool, WalletError> {
        Ok(true)
    }

    async fn request_allow(&self) -> Result<bool, WalletError> {
        Ok(true)
    }

    async fn public_key(&self) -> Result<String, WalletError> {
        Ok(self.public_key.clone())
    }

    async fn network(&self) -> Result<String, WalletError> {
        Ok("TESTNET".to_string())
    }

    async fn sign(
        &self,
        envelope_b64: &str,
        _network_passphrase: &str,
    ) -> Result<String, WalletError> {
        let mut envelope = TransactionEnvelope::from_base64(envelope_b64)
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        envelope.signatures.push(format!("sig:{}", self.public_key));
        envelope
            .to_base64()
            .map_err(|e| WalletError::Signing(e.to_string()))
    }
}

/// A wallet whose user rejects the signing prompt.
pub struct RejectingWallet;

impl WalletAdapter for RejectingWallet {
    async fn is_installed(&self) -> Result<bool, WalletError> {
        Ok(true)
    }

    async fn is_allowed(&self) -> Result<bool, WalletError> {
        Ok(true)
    }

    async fn request_allow(&self) -> Result<bool, WalletError> {
        Ok(true)
    }

    async fn public_key(&self) -> Result<String, WalletError> {
        Ok("GREJECT".to_string())
    }

    async fn network(&self) -> Result<String, WalletError> {
        Ok("TESTNET".to_string())
    }

    async fn sign(&self, _: &str, _: &str) -> Result<String, WalletError> {
        Err(WalletError::Signing("User declined access".to_string()))
    }
}
