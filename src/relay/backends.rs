/// Submission backends
///
/// The standard backend sends through the ledger RPC client. Accelerated
/// relays receive the signed transaction as base64 over HTTP at the endpoint
/// chosen by the router. Nothing here retries.
use super::providers::{RelayProvider, RelayTables};
use super::RelaySelection;
use crate::constants::RELAY_HTTP_TIMEOUT_SECS;
use crate::errors::{SwapError, SwapResult};
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::Transaction;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// Forwarded as `maxRetries`; `None` leaves the node default
    pub max_retries: Option<usize>,
}

#[async_trait]
pub trait SubmissionBackend: Send + Sync {
    fn provider(&self) -> RelayProvider;

    /// Sign `transaction` with `signer` and hand it to the backend.
    /// Priority fee and tip are already encoded in the instructions and are
    /// passed for logging only.
    #[allow(clippy::too_many_arguments)]
    async fn submit(
        &self,
        transaction: Transaction,
        signer: &Keypair,
        priority_fee_sol: f64,
        tip_lamports: u64,
        skip_preflight: bool,
        options: &SubmitOptions,
        provider_metadata: &RelaySelection,
    ) -> SwapResult<Signature>;
}

fn sign(
    provider: RelayProvider,
    mut transaction: Transaction,
    signer: &Keypair,
) -> SwapResult<Transaction> {
    let blockhash = transaction.message.recent_blockhash;
    transaction
        .try_sign(&[signer], blockhash)
        .map_err(|e| SwapError::Submission {
            provider,
            message: format!("Failed to sign transaction: {}", e),
        })?;
    Ok(transaction)
}

/// Standard path: `sendTransaction` through the ledger RPC
pub struct RpcSubmitter {
    client: Arc<RpcClient>,
}

impl RpcSubmitter {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubmissionBackend for RpcSubmitter {
    fn provider(&self) -> RelayProvider {
        RelayProvider::Standard
    }

    async fn submit(
        &self,
        transaction: Transaction,
        signer: &Keypair,
        priority_fee_sol: f64,
        _tip_lamports: u64,
        skip_preflight: bool,
        options: &SubmitOptions,
        _provider_metadata: &RelaySelection,
    ) -> SwapResult<Signature> {
        let transaction = sign(RelayProvider::Standard, transaction, signer)?;

        logger::info(
            LogTag::Relay,
            &format!(
                "Submitting via RPC (priority fee {} SOL, skip_preflight={})",
                priority_fee_sol, skip_preflight
            ),
        );

        let config = RpcSendTransactionConfig {
            skip_preflight,
            max_retries: options.max_retries,
            ..RpcSendTransactionConfig::default()
        };
        self.client
            .send_transaction_with_config(&transaction, config)
            .await
            .map_err(|e| SwapError::Submission {
                provider: RelayProvider::Standard,
                message: e.to_string(),
            })
    }
}

/// HTTP request for one relay submission
#[derive(Debug, Clone, PartialEq)]
pub struct RelayRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

/// Provider-specific request shape. NextBlock takes its own submit body;
/// every other relay speaks JSON-RPC `sendTransaction`.
pub fn build_relay_request(
    provider: RelayProvider,
    endpoint: &str,
    encoded_transaction: &str,
    skip_preflight: bool,
    anti_mev: bool,
    auth_token: Option<&str>,
) -> RelayRequest {
    let mut url = endpoint.to_string();
    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];

    let body = match provider {
        RelayProvider::NextBlock => json!({
            "transaction": { "content": encoded_transaction },
            "frontRunningProtection": anti_mev,
        }),
        _ => json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "sendTransaction",
            "params": [
                encoded_transaction,
                { "encoding": "base64", "skipPreflight": skip_preflight }
            ],
        }),
    };

    if let Some(token) = auth_token.filter(|t| !t.is_empty()) {
        match provider {
            RelayProvider::NextBlock => headers.push(("Authorization".to_string(), token.to_string())),
            RelayProvider::Jito => headers.push(("x-jito-auth".to_string(), token.to_string())),
            RelayProvider::ZeroSlot => url = append_query(&url, "api-key", token),
            RelayProvider::Temporal => url = append_query(&url, "c", token),
            RelayProvider::Standard => {}
        }
    }

    RelayRequest { url, headers, body }
}

fn append_query(url: &str, key: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, separator, key, value)
}

/// Signature reported by the relay, if any. JSON-RPC errors become
/// `SwapError::Submission`.
pub fn parse_relay_response(provider: RelayProvider, response: &Value) -> SwapResult<Option<Signature>> {
    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(SwapError::Submission { provider, message });
    }

    let reported = response
        .get("result")
        .and_then(Value::as_str)
        .or_else(|| response.get("signature").and_then(Value::as_str));

    match reported {
        Some(text) => Signature::from_str(text)
            .map(Some)
            .map_err(|e| SwapError::Submission {
                provider,
                message: format!("Invalid signature '{}': {}", text, e),
            }),
        None => Ok(None),
    }
}

/// Accelerated relay reached over HTTP
pub struct JsonRpcRelaySubmitter {
    provider: RelayProvider,
    endpoint: String,
    auth_token: Option<String>,
    http: reqwest::Client,
}

impl JsonRpcRelaySubmitter {
    pub fn new(provider: RelayProvider, endpoint: String, auth_token: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(RELAY_HTTP_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            provider,
            endpoint,
            auth_token,
            http,
        }
    }

    fn submission_error(&self, message: String) -> SwapError {
        SwapError::Submission {
            provider: self.provider,
            message,
        }
    }
}

#[async_trait]
impl SubmissionBackend for JsonRpcRelaySubmitter {
    fn provider(&self) -> RelayProvider {
        self.provider
    }

    async fn submit(
        &self,
        transaction: Transaction,
        signer: &Keypair,
        priority_fee_sol: f64,
        tip_lamports: u64,
        skip_preflight: bool,
        _options: &SubmitOptions,
        provider_metadata: &RelaySelection,
    ) -> SwapResult<Signature> {
        let transaction = sign(self.provider, transaction, signer)?;
        let local_signature = transaction.signatures.first().copied().unwrap_or_default();

        let bytes = bincode::serialize(&transaction)
            .map_err(|e| self.submission_error(format!("Failed to serialize transaction: {}", e)))?;
        let encoded = STANDARD.encode(bytes);

        let request = build_relay_request(
            self.provider,
            &self.endpoint,
            &encoded,
            skip_preflight,
            provider_metadata.anti_mev,
            self.auth_token.as_deref(),
        );

        logger::info(
            LogTag::Relay,
            &format!(
                "Submitting via {} at {} (tip {} lamports, priority fee {} SOL)",
                self.provider, self.endpoint, tip_lamports, priority_fee_sol
            ),
        );

        let mut builder = self.http.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.submission_error(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(self.submission_error(format!("HTTP {}: {}", status, text)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| self.submission_error(format!("Invalid response body: {}", e)))?;

        let signature = parse_relay_response(self.provider, &body)?.unwrap_or(local_signature);
        logger::debug(LogTag::Relay, &format!("{} accepted {}", self.provider, signature));
        Ok(signature)
    }
}

/// Backend for a router selection. Selections without an endpoint go
/// through the standard RPC.
pub fn backend_for(
    selection: &RelaySelection,
    client: Arc<RpcClient>,
    tables: &RelayTables,
) -> Arc<dyn SubmissionBackend> {
    match (&selection.endpoint, selection.provider) {
        (Some(endpoint), provider) if provider != RelayProvider::Standard => {
            let auth_token = tables
                .get(provider)
                .and_then(|table| table.auth_token.clone());
            Arc::new(JsonRpcRelaySubmitter::new(provider, endpoint.clone(), auth_token))
        }
        _ => Arc::new(RpcSubmitter::new(client)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::{RelayPreferences, Region};
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn test_jsonrpc_request_shape() {
        let request = build_relay_request(
            RelayProvider::Jito,
            "https://ny.example/api/v1/transactions",
            "AQID",
            true,
            false,
            Some("uuid"),
        );
        assert_eq!(request.body["method"], "sendTransaction");
        assert_eq!(request.body["params"][0], "AQID");
        assert_eq!(request.body["params"][1]["encoding"], "base64");
        assert_eq!(request.body["params"][1]["skipPreflight"], true);
        assert!(request
            .headers
            .contains(&("x-jito-auth".to_string(), "uuid".to_string())));
    }

    #[test]
    fn test_nextblock_request_shape() {
        let request = build_relay_request(
            RelayProvider::NextBlock,
            "https://fra.example/api/v2/submit",
            "AQID",
            true,
            true,
            Some("key"),
        );
        assert_eq!(request.body["transaction"]["content"], "AQID");
        assert_eq!(request.body["frontRunningProtection"], true);
        assert!(request.body.get("method").is_none());
        assert!(request
            .headers
            .contains(&("Authorization".to_string(), "key".to_string())));
    }

    #[test]
    fn test_query_auth_tokens() {
        let zeroslot = build_relay_request(RelayProvider::ZeroSlot, "https://ny.example", "x", true, false, Some("k"));
        assert_eq!(zeroslot.url, "https://ny.example?api-key=k");

        let temporal = build_relay_request(RelayProvider::Temporal, "http://t.example/?x=1", "x", true, false, Some("k"));
        assert_eq!(temporal.url, "http://t.example/?x=1&c=k");

        let anonymous = build_relay_request(RelayProvider::ZeroSlot, "https://ny.example", "x", true, false, None);
        assert_eq!(anonymous.url, "https://ny.example");
    }

    #[test]
    fn test_parse_relay_response() {
        let signature = Signature::new_unique();
        let ok = json!({ "jsonrpc": "2.0", "result": signature.to_string(), "id": 1 });
        assert_eq!(parse_relay_response(RelayProvider::Jito, &ok).unwrap(), Some(signature));

        let nextblock = json!({ "signature": signature.to_string() });
        assert_eq!(
            parse_relay_response(RelayProvider::NextBlock, &nextblock).unwrap(),
            Some(signature)
        );

        let empty = json!({ "status": "accepted" });
        assert_eq!(parse_relay_response(RelayProvider::Temporal, &empty).unwrap(), None);

        let failed = json!({ "error": { "code": -32602, "message": "bundle rejected" } });
        match parse_relay_response(RelayProvider::Jito, &failed) {
            Err(SwapError::Submission { provider, message }) => {
                assert_eq!(provider, RelayProvider::Jito);
                assert_eq!(message, "bundle rejected");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_backend_for_selection() {
        let client = Arc::new(RpcClient::new("http://127.0.0.1:8899".to_string()));
        let tables = RelayTables::builtin();

        let standard = RelaySelection::standard(&RelayPreferences::default());
        assert_eq!(
            backend_for(&standard, client.clone(), &tables).provider(),
            RelayProvider::Standard
        );

        let accelerated = RelaySelection {
            provider: RelayProvider::Jito,
            region: Some(Region::Tokyo),
            endpoint: Some("https://tokyo.example".to_string()),
            tip_address: Some(Pubkey::new_unique()),
            tip_lamports: 10_000,
            anti_mev: false,
            skip_preflight: true,
        };
        assert_eq!(
            backend_for(&accelerated, client, &tables).provider(),
            RelayProvider::Jito
        );
    }
}
