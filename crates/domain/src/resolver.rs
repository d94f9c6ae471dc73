use async_trait::async_trait;

use crate::error::Result;

/// Source of the WebSocket URL a gateway session connects to.
///
/// The REST client implements this against `GET /gateway/bot`; tests plug
/// in fixed or failing resolvers.
#[async_trait]
pub trait EndpointResolver: Send + Sync {
    async fn resolve_gateway_url(&self) -> Result<String>;
}

/// A resolver that always returns the same URL.
#[derive(Debug, Clone)]
pub struct StaticResolver(pub String);

#[async_trait]
impl EndpointResolver for StaticResolver {
    async fn resolve_gateway_url(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
