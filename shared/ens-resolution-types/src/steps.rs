use core::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::target::AddressKind;

/// Discriminant of a [`Step`], in canonical execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    SetResolver,
    SetAddr,
    ClaimReverse,
    SetName,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepKind::SetResolver => "SET_RESOLVER",
            StepKind::SetAddr => "SET_ADDR",
            StepKind::ClaimReverse => "CLAIM_REVERSE_WITH_RESOLVER",
            StepKind::SetName => "SET_NAME",
        };
        f.write_str(s)
    }
}

/// Contract that receives the reverse `setName` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum NameSetter {
    /// EOA targets: `ReverseRegistrar.setName(name)`.
    ReverseRegistrar { registrar: Address },
    /// Contract targets: `RegistryEntry.setName(registry, name)` on the target itself.
    RegistryEntry { registry: Address },
}

/// One transaction of the configuration workflow, carrying everything needed to build it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    SetResolver {
        name: String,
        resolver: Address,
    },
    SetAddr {
        name: String,
        resolver: Address,
        address: Address,
    },
    ClaimReverse {
        address: Address,
        resolver: Address,
        registrar: Address,
    },
    SetName {
        name: String,
        address: Address,
        setter: NameSetter,
    },
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::SetResolver { .. } => StepKind::SetResolver,
            Step::SetAddr { .. } => StepKind::SetAddr,
            Step::ClaimReverse { .. } => StepKind::ClaimReverse,
            Step::SetName { .. } => StepKind::SetName,
        }
    }
}

/// Ordered steps computed for one run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub kind: AddressKind,
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(Step::kind).collect()
    }
}
