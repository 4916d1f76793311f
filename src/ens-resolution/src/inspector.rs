//! Read-only ownership and resolution queries against the registry and resolvers.

use alloy_primitives::{Address, B256};
use alloy_sol_types::SolCall;
use tracing::debug;

use crate::{
    chain::ChainClient,
    errors::{self, DecodeError, Result},
    interfaces::{IENSRegistry, IPublicResolver, IRegistryEntry},
    target::AddressKind,
    utils::namehash::{namehash, reverse_name},
};

/// Registry reader bound to one client and one registry address.
///
/// Every method is side-effect free. "Unset" answers (zero owner, zero resolver, empty
/// name) are values, not errors; only transport or decoding failures are
/// [`crate::ResolutionError::Lookup`].
pub struct OwnershipInspector<'a, C: ChainClient + ?Sized> {
    client: &'a C,
    registry: Address,
}

impl<'a, C: ChainClient + ?Sized> OwnershipInspector<'a, C> {
    pub fn new(client: &'a C, registry: Address) -> Self {
        Self { client, registry }
    }

    /// Registry owner of `subject`; `Address::ZERO` when unset.
    pub async fn owner_of(&self, subject: &str) -> Result<Address> {
        let node = namehash(subject);
        let out = self
            .call::<IENSRegistry::ownerCall>(self.registry, IENSRegistry::ownerCall { node })
            .await?;
        debug!(subject, owner = %out.nodeOwner, "registry owner");
        Ok(out.nodeOwner)
    }

    /// Resolver registered for `name`, `None` when unset.
    pub async fn resolver_of(&self, name: &str) -> Result<Option<Address>> {
        self.resolver_of_node(namehash(name)).await
    }

    async fn resolver_of_node(&self, node: B256) -> Result<Option<Address>> {
        let out = self
            .call::<IENSRegistry::resolverCall>(self.registry, IENSRegistry::resolverCall { node })
            .await?;
        Ok(non_zero(out.nodeResolver))
    }

    /// Plain account or deployed contract, from the bytecode at `address`.
    pub async fn address_kind(&self, address: Address) -> Result<AddressKind> {
        let code = self
            .client
            .get_code(address)
            .await
            .map_err(|e| errors::lookup("getCode", e))?;
        Ok(AddressKind::from_code(&code))
    }

    /// Deployed bytecode exists at `address`.
    pub async fn has_code(&self, address: Address) -> Result<bool> {
        Ok(self.address_kind(address).await?.is_contract())
    }

    /// Forward record of `name` stored on a specific resolver.
    pub async fn addr_via(&self, resolver: Address, name: &str) -> Result<Option<Address>> {
        let out = self
            .call::<IPublicResolver::addrCall>(
                resolver,
                IPublicResolver::addrCall {
                    node: namehash(name),
                },
            )
            .await?;
        Ok(non_zero(out.resolved))
    }

    /// Forward resolution through the name's current resolver.
    pub async fn resolved_address(&self, name: &str) -> Result<Option<Address>> {
        match self.resolver_of(name).await? {
            Some(resolver) => self.addr_via(resolver, name).await,
            None => Ok(None),
        }
    }

    /// Reverse resolution of `address`.
    ///
    /// Only returned when the name found in the reverse record forward-resolves back to
    /// `address`; an unverified claim is reported as `None`.
    pub async fn reverse_name_of(&self, address: Address) -> Result<Option<String>> {
        let node = namehash(&reverse_name(address));
        let Some(resolver) = self.resolver_of_node(node).await? else {
            return Ok(None);
        };
        let out = self
            .call::<IPublicResolver::nameCall>(resolver, IPublicResolver::nameCall { node })
            .await?;
        let name = out.resolvedName;
        if name.is_empty() {
            return Ok(None);
        }
        let forward = self.resolved_address(&name).await?;
        if forward != Some(address) {
            debug!(%address, name = %name, "reverse record does not resolve back");
            return Ok(None);
        }
        Ok(Some(name))
    }

    /// `owner()` of an ownable contract; `None` when the contract does not answer it.
    pub async fn entry_owner(&self, contract: Address) -> Result<Option<Address>> {
        let data = IRegistryEntry::ownerCall {}.abi_encode();
        match self.client.call(contract, data.into()).await {
            Ok(out) => Ok(IRegistryEntry::ownerCall::abi_decode_returns(&out, true)
                .ok()
                .and_then(|r| non_zero(r.entryOwner))),
            Err(e) => {
                debug!(%contract, error = %e, "owner() call failed");
                Ok(None)
            }
        }
    }

    /// Text record `key` of `name` on `resolver`.
    pub async fn text(&self, resolver: Address, name: &str, key: &str) -> Result<String> {
        let out = self
            .call::<IPublicResolver::textCall>(
                resolver,
                IPublicResolver::textCall {
                    node: namehash(name),
                    key: key.to_string(),
                },
            )
            .await?;
        Ok(out.value)
    }

    async fn call<T: SolCall>(&self, to: Address, call: T) -> Result<T::Return> {
        let out = self
            .client
            .call(to, call.abi_encode().into())
            .await
            .map_err(|e| errors::lookup(T::SIGNATURE, e))?;
        T::abi_decode_returns(&out, true).map_err(|e| {
            DecodeError {
                call: T::SIGNATURE,
                reason: e.to_string(),
            }
            .into()
        })
    }
}

fn non_zero(address: Address) -> Option<Address> {
    (address != Address::ZERO).then_some(address)
}
