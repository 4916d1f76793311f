//! One-shot registry operations outside the configuration workflow: read helpers, FIFS
//! label registration and text records.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use tracing::{debug, info};

use crate::{
    chain::{ChainClient, TxRequest},
    config::{ResolutionConfig, DEFAULT_BASE_DOMAIN},
    errors::{self, ResolutionError, Result},
    events::TxHash,
    inspector::OwnershipInspector,
    interfaces::{IFIFSRegistrar, IPublicResolver},
    utils::{
        namehash::{labelhash, namehash},
        validate,
    },
};

/// Result of [`register_fifs`]. `register_tx` is `None` when the caller already owned the name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub register_tx: Option<TxHash>,
}

/// Registry owner of `name`; `Address::ZERO` when unset.
pub async fn owner_of_name<C: ChainClient + ?Sized>(
    client: &C,
    config: &ResolutionConfig,
    name: &str,
) -> Result<Address> {
    let name = validate::ens_domain(name)?;
    OwnershipInspector::new(client, config.registry)
        .owner_of(&name)
        .await
}

/// Forward resolution of `name` through its current resolver.
pub async fn resolve_name<C: ChainClient + ?Sized>(
    client: &C,
    config: &ResolutionConfig,
    name: &str,
) -> Result<Option<Address>> {
    let name = validate::ens_domain(name)?;
    OwnershipInspector::new(client, config.registry)
        .resolved_address(&name)
        .await
}

/// Verified reverse resolution of `address`.
pub async fn lookup_address<C: ChainClient + ?Sized>(
    client: &C,
    config: &ResolutionConfig,
    address: Address,
) -> Result<Option<String>> {
    OwnershipInspector::new(client, config.registry)
        .reverse_name_of(address)
        .await
}

/// Register `label` under `domain` (default [`DEFAULT_BASE_DOMAIN`]) through the domain's
/// first-in-first-served registrar.
pub async fn register_fifs<C: ChainClient + ?Sized>(
    client: &C,
    config: &ResolutionConfig,
    label: &str,
    domain: Option<&str>,
) -> Result<Registration> {
    let domain = validate::ens_domain(domain.unwrap_or(DEFAULT_BASE_DOMAIN))?;
    let label = validate::ens_label(label)?;
    let caller = signer(client)?;
    let name = format!("{label}.{domain}");
    let inspector = OwnershipInspector::new(client, config.registry);

    let owned_by = inspector.owner_of(&name).await?;
    if owned_by == caller {
        debug!(name = %name, %owned_by, "already owned by current wallet");
        return Ok(Registration {
            name,
            register_tx: None,
        });
    }
    if owned_by != Address::ZERO {
        return Err(ResolutionError::Authorization(format!(
            "{name} is already owned by {owned_by}"
        )));
    }

    let registrar = inspector.owner_of(&domain).await?;
    if !inspector.has_code(registrar).await? {
        return Err(ResolutionError::Configuration(format!(
            "the base domain {domain} owner {registrar} is not a contract"
        )));
    }

    let data = IFIFSRegistrar::registerCall {
        label: labelhash(&label),
        owner: caller,
    }
    .abi_encode();
    let tx = send_and_confirm(client, config, registrar, data, "register").await?;
    info!(name = %name, %tx, "registered");
    Ok(Registration {
        name,
        register_tx: Some(tx),
    })
}

/// Text record `key` of `name`.
pub async fn read_text_record<C: ChainClient + ?Sized>(
    client: &C,
    config: &ResolutionConfig,
    name: &str,
    key: &str,
) -> Result<String> {
    let name = validate::ens_domain(name)?;
    let key = validate::text_record_key(key)?;
    let inspector = OwnershipInspector::new(client, config.registry);
    let resolver = configured_resolver(&inspector, &name).await?;
    inspector.text(resolver, &name, &key).await
}

/// Set text record `key` of `name` to `value`; only the name owner may do so.
pub async fn set_text_record<C: ChainClient + ?Sized>(
    client: &C,
    config: &ResolutionConfig,
    name: &str,
    key: &str,
    value: &str,
) -> Result<TxHash> {
    let name = validate::ens_domain(name)?;
    let key = validate::text_record_key(key)?;
    let inspector = OwnershipInspector::new(client, config.registry);
    let resolver = configured_resolver(&inspector, &name).await?;

    let caller = signer(client)?;
    let owner = inspector.owner_of(&name).await?;
    if owner != caller {
        return Err(ResolutionError::Authorization(format!(
            "{caller} is not authorised to set a text record for {name}"
        )));
    }

    let data = IPublicResolver::setTextCall {
        node: namehash(&name),
        key,
        value: value.to_string(),
    }
    .abi_encode();
    send_and_confirm(client, config, resolver, data, "setText").await
}

async fn configured_resolver<C: ChainClient + ?Sized>(
    inspector: &OwnershipInspector<'_, C>,
    name: &str,
) -> Result<Address> {
    inspector.resolver_of(name).await?.ok_or_else(|| {
        ResolutionError::Configuration(format!("no resolver is configured for {name}"))
    })
}

fn signer<C: ChainClient + ?Sized>(client: &C) -> Result<Address> {
    client
        .signer()
        .ok_or_else(|| ResolutionError::Authorization("no signer".to_string()))
}

async fn send_and_confirm<C: ChainClient + ?Sized>(
    client: &C,
    config: &ResolutionConfig,
    to: Address,
    data: Vec<u8>,
    context: &str,
) -> Result<TxHash> {
    let tx = client
        .send_transaction(TxRequest {
            to,
            data: Bytes::from(data),
            gas_price: config.tx.gas_price,
        })
        .await
        .map_err(|e| errors::transaction(context, e))?;
    client
        .wait_for_confirmations(tx, config.tx.confirmations)
        .await
        .map_err(|e| errors::transaction(context, e))?;
    Ok(tx)
}
