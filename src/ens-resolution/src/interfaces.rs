//! Solidity ABI interfaces for the ENS contracts the workflow talks to.
//!
//! Only the functions actually called are declared; calldata is produced with
//! `SolCall::abi_encode` and return data decoded with `SolCall::abi_decode_returns`.

use alloy_sol_types::sol;

sol! {
    interface IENSRegistry {
        function owner(bytes32 node) external view returns (address nodeOwner);
        function resolver(bytes32 node) external view returns (address nodeResolver);
        function setResolver(bytes32 node, address resolver) external;
    }

    interface IPublicResolver {
        function addr(bytes32 node) external view returns (address resolved);
        function setAddr(bytes32 node, address a) external;
        function name(bytes32 node) external view returns (string resolvedName);
        function text(bytes32 node, string key) external view returns (string value);
        function setText(bytes32 node, string key, string value) external;
    }

    interface IReverseRegistrar {
        function claimWithResolver(address owner, address resolver) external returns (bytes32 node);
        function setName(string name) external returns (bytes32 node);
    }

    /// Ownable contract able to set its own reverse record through the registry.
    interface IRegistryEntry {
        function owner() external view returns (address entryOwner);
        function setName(address ens, string name) external;
    }

    interface IFIFSRegistrar {
        function register(bytes32 label, address owner) external;
    }
}
