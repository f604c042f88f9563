//! Bridge metrics.
//!
//! Every component owns an instance of its metrics struct labelled with the chain id it runs on.
use metrics::Counter;
use metrics_derive::Metrics;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Metrics for a [`MessageBridge`](crate::bridge::MessageBridge).
#[derive(Metrics, Clone)]
#[metrics(scope = "bridge")]
pub struct BridgeMetrics {
    /// Number of sent messages.
    pub messages_sent: Counter,
    /// Number of received messages.
    pub messages_received: Counter,
    /// Number of received messages whose call into the recipient failed.
    pub failed_calls: Counter,
    /// Number of rejected replays.
    pub replays_rejected: Counter,
    /// Number of rejected inclusion proofs.
    pub proofs_rejected: Counter,
}

/// Metrics for a [`BatchLedger`](crate::rollup::BatchLedger).
#[derive(Metrics, Clone)]
#[metrics(scope = "rollup")]
pub struct LedgerMetrics {
    /// Number of accepted batches.
    pub batches_accepted: Counter,
    /// Number of rejected batches.
    pub batches_rejected: Counter,
}

/// Metrics for a [`TokenGateway`](crate::gateway::TokenGateway).
#[derive(Metrics, Clone)]
#[metrics(scope = "gateway")]
pub struct GatewayMetrics {
    /// Number of outbound transfers of native assets.
    pub tokens_locked: Counter,
    /// Number of outbound transfers of pegged assets.
    pub tokens_burned: Counter,
    /// Number of inbound transfers minting pegged assets.
    pub tokens_minted: Counter,
    /// Number of inbound transfers releasing native assets.
    pub tokens_released: Counter,
    /// Number of lazily deployed pegged assets.
    pub assets_deployed: Counter,
}

/// Installs a Prometheus recorder as the global metrics recorder, returning its handle.
pub fn install_recorder() -> eyre::Result<PrometheusHandle> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}

/// Labels attached to every metric of a component.
pub(crate) fn chain_labels(chain_id: u64) -> [(&'static str, String); 1] {
    [("chain_id", chain_id.to_string())]
}
