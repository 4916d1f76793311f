//! [`ChainClient`] over an `ethers` HTTP provider with an optional local signer.

use alloy_primitives::{Address, Bytes, B256, U256};
use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{
        transaction::eip2718::TypedTransaction, Bytes as EthBytes, TransactionRequest, H160, H256,
        U256 as EthU256, U64,
    },
};

use tracing::debug;

use ens_resolution::{ChainClient, ChainError, TxHash, TxRequest};

pub struct EthersChainClient {
    provider: Provider<Http>,
    signer: Option<SignerMiddleware<Provider<Http>, LocalWallet>>,
}

impl EthersChainClient {
    /// Connect to `rpc_url`; `private_key` (hex) attaches a signer bound to the node's chain id.
    pub async fn connect(rpc_url: &str, private_key: Option<&str>) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .with_context(|| format!("invalid RPC URL {rpc_url}"))?;
        let signer = match private_key {
            Some(key) => {
                let chain_id = provider
                    .get_chainid()
                    .await
                    .context("failed fetching chain id")?;
                let wallet: LocalWallet = key
                    .trim()
                    .parse()
                    .context("failed parsing private key")?;
                let wallet = wallet.with_chain_id(chain_id.as_u64());
                debug!(%chain_id, signer = ?wallet.address(), "signer attached");
                Some(SignerMiddleware::new(provider.clone(), wallet))
            }
            None => None,
        };
        Ok(Self { provider, signer })
    }
}

fn to_h160(address: Address) -> H160 {
    H160::from_slice(address.as_slice())
}

fn to_h256(hash: B256) -> H256 {
    H256::from_slice(hash.as_slice())
}

fn to_eth_u256(value: U256) -> EthU256 {
    EthU256::from_big_endian(&value.to_be_bytes::<32>())
}

fn request(to: Address, data: Bytes) -> TransactionRequest {
    TransactionRequest::new()
        .to(to_h160(to))
        .data(EthBytes::from(data.to_vec()))
}

#[async_trait]
impl ChainClient for EthersChainClient {
    fn signer(&self) -> Option<Address> {
        self.signer
            .as_ref()
            .map(|s| Address::from_slice(s.address().as_bytes()))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        let tx: TypedTransaction = request(to, data).into();
        let out = self
            .provider
            .call(&tx, None)
            .await
            .map_err(|e| ChainError::Call(e.to_string()))?;
        Ok(Bytes::from(out.to_vec()))
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, ChainError> {
        let code = self
            .provider
            .get_code(to_h160(address), None)
            .await
            .map_err(|e| ChainError::Call(e.to_string()))?;
        Ok(Bytes::from(code.to_vec()))
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<TxHash, ChainError> {
        let signer = self.signer.as_ref().ok_or(ChainError::NoSigner)?;
        let mut req = request(tx.to, tx.data);
        if let Some(gas_price) = tx.gas_price {
            req = req.gas_price(to_eth_u256(gas_price));
        }
        let pending = signer
            .send_transaction(req, None)
            .await
            .map_err(|e| ChainError::Submission(e.to_string()))?;
        Ok(B256::from_slice(pending.tx_hash().as_bytes()))
    }

    async fn wait_for_confirmations(
        &self,
        tx: TxHash,
        confirmations: usize,
    ) -> Result<(), ChainError> {
        let receipt = PendingTransaction::new(to_h256(tx), &self.provider)
            .confirmations(confirmations)
            .await
            .map_err(|e| ChainError::Confirmation {
                tx,
                reason: e.to_string(),
            })?;
        match receipt {
            Some(r) if r.status == Some(U64::from(1)) => Ok(()),
            Some(_) => Err(ChainError::Reverted(tx)),
            None => Err(ChainError::Confirmation {
                tx,
                reason: "transaction dropped from mempool".to_string(),
            }),
        }
    }
}
