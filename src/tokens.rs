use async_trait::async_trait;
use ethers::{providers::Middleware, types::Address};
use log::debug;
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;

use crate::abi::ERC20;
use crate::constants::UNKNOWN_TOKEN_NAME;

/// Best-effort display names for reward tokens.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenNameResolver {
    /// Never fails; unreadable names come back as a placeholder.
    async fn get_token_name(&self, token: Address) -> String;
}

pub struct Erc20NameResolver<M> {
    client: Arc<M>,
}

impl<M: Middleware + 'static> Erc20NameResolver<M> {
    pub fn new(client: Arc<M>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<M: Middleware + 'static> TokenNameResolver for Erc20NameResolver<M> {
    async fn get_token_name(&self, token: Address) -> String {
        let contract = ERC20::new(token, self.client.clone());
        match contract.name().call().await {
            Ok(name) => name,
            Err(e) => {
                debug!("Failed to read name of token {:?}: {}", token, e);
                UNKNOWN_TOKEN_NAME.to_string()
            }
        }
    }
}
