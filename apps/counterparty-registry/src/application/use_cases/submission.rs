//! Timed ledger submission shared by the mutating use cases.

use std::time::Instant;

use crate::application::ports::{Confirmation, GatewayError, LedgerGatewayPort, LedgerMutation};
use crate::observability::record_gateway_latency;

/// Submit `mutation` and record the round-trip latency.
pub(super) async fn submit_timed<G>(
    gateway: &G,
    mutation: LedgerMutation,
) -> Result<Confirmation, GatewayError>
where
    G: LedgerGatewayPort,
{
    let kind = mutation.kind();
    let identity = mutation.identity().clone();
    let sequence = mutation.sequence();
    let started = Instant::now();

    tracing::debug!(identity = %identity, sequence, mutation = kind, "Submitting to ledger");
    let result = gateway.submit(mutation).await;
    let elapsed = started.elapsed().as_secs_f64();

    match &result {
        Ok(confirmation) => {
            record_gateway_latency(kind, "confirmed", elapsed);
            tracing::debug!(
                identity = %identity,
                sequence,
                tx = %confirmation.reference,
                "Ledger confirmed mutation"
            );
        }
        Err(e) => {
            record_gateway_latency(kind, "failed", elapsed);
            tracing::warn!(identity = %identity, sequence, error = %e, "Ledger submission failed");
        }
    }

    result
}
