use async_trait::async_trait;

use crate::errors::CoreError;

/// Trait abstraction for current-price sources.
///
/// One question only: what is this symbol trading at now.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Most recent intraday opening price for `symbol`.
    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError>;
}
