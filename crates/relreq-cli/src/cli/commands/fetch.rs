//! `relreq fetch <url>` – reliable GET with escalating timeouts.

use anyhow::{Context, Result};
use relreq_core::config::RelreqConfig;
use relreq_core::retry::RetryEngine;
use relreq_core::sink::{CollectSink, StdoutSink};
use relreq_core::transport::CurlTransport;
use std::path::Path;

use crate::cli::RetryArgs;

pub async fn run_fetch(
    cfg: &RelreqConfig,
    url: &str,
    output: Option<&Path>,
    retry: &RetryArgs,
) -> Result<()> {
    let policy = retry.apply(cfg.retry_policy()?)?;
    let transport = CurlTransport::new(cfg.curl_options()?);
    let engine = RetryEngine::new(transport, policy);
    tracing::debug!("fetch {} with {:?}", url, engine.policy());

    match output {
        Some(path) => {
            let mut sink = CollectSink::new();
            let delivery = engine.deliver(url, &mut sink).await?;
            let body = sink.into_payload().unwrap_or_default();
            tokio::fs::write(path, &body)
                .await
                .with_context(|| format!("write {}", path.display()))?;
            println!(
                "Saved {} bytes to {} (attempt {})",
                body.len(),
                path.display(),
                delivery.attempts
            );
        }
        None => {
            let mut sink = StdoutSink;
            let delivery = engine.deliver(url, &mut sink).await?;
            tracing::info!("fetched {} in {} attempt(s)", url, delivery.attempts);
        }
    }
    Ok(())
}
