//! Pure planning: facts in, ordered steps out.

use alloy_primitives::Address;

use crate::{
    errors::{ResolutionError, Result},
    steps::{NameSetter, Plan, Step},
    target::{AddressKind, ResolutionFacts, ResolutionTarget},
};

/// Compute the steps needed to configure `target`, in canonical order.
///
/// Preconditions are checked first and in a fixed order; the first one that fails is
/// returned and no plan is produced. Each step is then included only if its effect is not
/// already visible in `facts`, so re-running after a partial run only plans what is left.
pub fn plan(target: &ResolutionTarget, facts: &ResolutionFacts, registry: Address) -> Result<Plan> {
    if !facts.resolver_is_contract {
        return Err(ResolutionError::Configuration(format!(
            "resolver not a contract: {}",
            facts.resolver
        )));
    }

    let name_owner = facts
        .name_owner
        .as_ref()
        .map(|f| f.owner)
        .unwrap_or(Address::ZERO);
    if name_owner != facts.caller {
        return Err(ResolutionError::Authorization(format!(
            "{} is not owner of {} (owner: {})",
            facts.caller, target.name, name_owner
        )));
    }

    let registrar = match target.kind {
        AddressKind::Contract => {
            if facts.entry_owner != Some(facts.caller) {
                return Err(ResolutionError::Authorization(format!(
                    "{} is not the owner of {}, impossible to setup ENS resolution",
                    facts.caller, target.address
                )));
            }
            None
        }
        AddressKind::Eoa => {
            if target.address != facts.caller {
                return Err(ResolutionError::Authorization(format!(
                    "target address {} is not a contract and does not match current wallet address {}",
                    target.address, facts.caller
                )));
            }
            match facts.reverse_registrar {
                Some(r) if r != Address::ZERO => Some(r),
                _ => {
                    return Err(ResolutionError::Configuration(
                        "reverse registrar not configured".to_string(),
                    ))
                }
            }
        }
    };

    let mut steps = Vec::new();

    if facts.current_resolver != Some(facts.resolver) {
        steps.push(Step::SetResolver {
            name: target.name.clone(),
            resolver: facts.resolver,
        });
    }

    if facts.forward_address != Some(target.address) {
        steps.push(Step::SetAddr {
            name: target.name.clone(),
            resolver: facts.resolver,
            address: target.address,
        });
    }

    // Setting the name hands the reverse node to the registrar, so ownership is only
    // meaningful while the reverse name is still wrong.
    let reverse_named = facts.reverse_name.as_deref() == Some(target.name.as_str());
    if let Some(registrar) = registrar.filter(|_| !reverse_named) {
        let claimed = facts
            .reverse_owner
            .as_ref()
            .is_some_and(|f| f.is_owned_by(facts.caller));
        if !claimed {
            steps.push(Step::ClaimReverse {
                address: target.address,
                resolver: facts.resolver,
                registrar,
            });
        }
    }

    if !reverse_named {
        let setter = match registrar {
            Some(registrar) => NameSetter::ReverseRegistrar { registrar },
            None => NameSetter::RegistryEntry { registry },
        };
        steps.push(Step::SetName {
            name: target.name.clone(),
            address: target.address,
            setter,
        });
    }

    Ok(Plan {
        kind: target.kind,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{steps::StepKind, target::OwnershipFact};

    const REGISTRY: Address = Address::repeat_byte(0xe5);
    const RESOLVER: Address = Address::repeat_byte(0x77);
    const CALLER: Address = Address::repeat_byte(0xca);
    const REVERSE_REGISTRAR: Address = Address::repeat_byte(0x88);
    const CONTRACT: Address = Address::repeat_byte(0xc0);

    fn eoa_target() -> ResolutionTarget {
        ResolutionTarget {
            name: "alice.users.example.eth".to_string(),
            address: CALLER,
            kind: AddressKind::Eoa,
        }
    }

    fn contract_target() -> ResolutionTarget {
        ResolutionTarget {
            name: "app.users.example.eth".to_string(),
            address: CONTRACT,
            kind: AddressKind::Contract,
        }
    }

    fn fresh_facts(target: &ResolutionTarget) -> ResolutionFacts {
        ResolutionFacts {
            caller: CALLER,
            resolver: RESOLVER,
            resolver_is_contract: true,
            name_owner: Some(OwnershipFact::new(target.name.clone(), CALLER)),
            entry_owner: target.kind.is_contract().then_some(CALLER),
            reverse_registrar: (!target.kind.is_contract()).then_some(REVERSE_REGISTRAR),
            ..Default::default()
        }
    }

    #[test]
    fn test_fresh_eoa_plans_all_steps() {
        let target = eoa_target();
        let plan = plan(&target, &fresh_facts(&target), REGISTRY).unwrap();
        assert_eq!(
            plan.kinds(),
            vec![
                StepKind::SetResolver,
                StepKind::SetAddr,
                StepKind::ClaimReverse,
                StepKind::SetName
            ]
        );
        assert_eq!(
            plan.steps[3],
            Step::SetName {
                name: target.name.clone(),
                address: CALLER,
                setter: NameSetter::ReverseRegistrar {
                    registrar: REVERSE_REGISTRAR
                },
            }
        );
    }

    #[test]
    fn test_contract_never_claims_reverse() {
        let target = contract_target();
        let plan = plan(&target, &fresh_facts(&target), REGISTRY).unwrap();
        assert_eq!(plan.kind, AddressKind::Contract);
        assert_eq!(
            plan.kinds(),
            vec![StepKind::SetResolver, StepKind::SetAddr, StepKind::SetName]
        );
        assert!(matches!(
            plan.steps[2],
            Step::SetName {
                setter: NameSetter::RegistryEntry { registry: REGISTRY },
                ..
            }
        ));
    }

    #[test]
    fn test_configured_target_plans_nothing() {
        let target = eoa_target();
        let facts = ResolutionFacts {
            current_resolver: Some(RESOLVER),
            forward_address: Some(CALLER),
            reverse_owner: Some(OwnershipFact::new("reverse", CALLER)),
            reverse_name: Some(target.name.clone()),
            ..fresh_facts(&target)
        };
        assert!(plan(&target, &facts, REGISTRY).unwrap().is_empty());
    }

    #[test]
    fn test_named_reverse_held_by_registrar_is_not_reclaimed() {
        let target = eoa_target();
        let facts = ResolutionFacts {
            current_resolver: Some(RESOLVER),
            forward_address: Some(CALLER),
            reverse_owner: Some(OwnershipFact::new("reverse", REVERSE_REGISTRAR)),
            reverse_name: Some(target.name.clone()),
            ..fresh_facts(&target)
        };
        assert!(plan(&target, &facts, REGISTRY).unwrap().is_empty());

        let facts = ResolutionFacts {
            reverse_name: Some("bob.users.example.eth".to_string()),
            ..facts
        };
        assert_eq!(
            plan(&target, &facts, REGISTRY).unwrap().kinds(),
            vec![StepKind::ClaimReverse, StepKind::SetName]
        );
    }

    #[test]
    fn test_partial_state_plans_remaining_steps() {
        let target = eoa_target();
        let facts = ResolutionFacts {
            current_resolver: Some(RESOLVER),
            forward_address: Some(Address::repeat_byte(0x01)),
            reverse_owner: Some(OwnershipFact::new("reverse", CALLER)),
            ..fresh_facts(&target)
        };
        let plan = plan(&target, &facts, REGISTRY).unwrap();
        assert_eq!(plan.kinds(), vec![StepKind::SetAddr, StepKind::SetName]);
    }

    #[test]
    fn test_resolver_without_code_is_checked_first() {
        let target = eoa_target();
        // Name owner is also wrong; the resolver check must still win.
        let facts = ResolutionFacts {
            resolver_is_contract: false,
            name_owner: None,
            ..fresh_facts(&target)
        };
        let err = plan(&target, &facts, REGISTRY).unwrap_err();
        assert!(matches!(err, ResolutionError::Configuration(_)));
    }

    #[test]
    fn test_name_not_owned_by_caller() {
        let target = eoa_target();
        let facts = ResolutionFacts {
            name_owner: Some(OwnershipFact::new(
                target.name.clone(),
                Address::repeat_byte(0x99),
            )),
            ..fresh_facts(&target)
        };
        let err = plan(&target, &facts, REGISTRY).unwrap_err();
        assert!(matches!(err, ResolutionError::Authorization(_)));
    }

    #[test]
    fn test_contract_owned_by_someone_else() {
        let target = contract_target();
        let facts = ResolutionFacts {
            entry_owner: Some(Address::repeat_byte(0x99)),
            ..fresh_facts(&target)
        };
        assert!(matches!(
            plan(&target, &facts, REGISTRY),
            Err(ResolutionError::Authorization(_))
        ));

        let facts = ResolutionFacts {
            entry_owner: None,
            ..fresh_facts(&target)
        };
        assert!(matches!(
            plan(&target, &facts, REGISTRY),
            Err(ResolutionError::Authorization(_))
        ));
    }

    #[test]
    fn test_eoa_must_be_caller() {
        let target = ResolutionTarget {
            address: Address::repeat_byte(0x42),
            ..eoa_target()
        };
        assert!(matches!(
            plan(&target, &fresh_facts(&target), REGISTRY),
            Err(ResolutionError::Authorization(_))
        ));
    }

    #[test]
    fn test_eoa_requires_reverse_registrar() {
        let target = eoa_target();
        let facts = ResolutionFacts {
            reverse_registrar: Some(Address::ZERO),
            ..fresh_facts(&target)
        };
        assert!(matches!(
            plan(&target, &facts, REGISTRY),
            Err(ResolutionError::Configuration(_))
        ));
    }
}
