//! # Delegation Registry Implementation
//!
//! Orchestrator -> validator and validator -> ethereum address indices.

use super::*;
use crate::domain::keys::{ethereum_address_key, orchestrator_validator_key, strip_prefix};
use crate::domain::{
    AccountAddress, AttestationError, AttestationResult, DelegateKeys, EthAddress, KeyPrefix,
    ValidatorAddress,
};
use crate::ports::inbound::DelegationRegistry;
use crate::ports::outbound::BatchOperation;
use std::collections::{BTreeMap, BTreeSet};

fn decode_eth_address(bytes: &[u8]) -> AttestationResult<EthAddress> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| AttestationError::decode("ethereum address", e))?;
    text.parse()
        .map_err(|e| AttestationError::decode("ethereum address", e))
}

/// Index writes for a set of delegations.
///
/// Each validator and each orchestrator may appear once; a repeat would
/// overwrite an earlier index entry and leave the other index dangling.
pub(crate) fn delegate_key_operations(
    keys: &[DelegateKeys],
) -> AttestationResult<Vec<BatchOperation>> {
    let mut validators = BTreeSet::new();
    let mut orchestrators = BTreeSet::new();
    for entry in keys {
        if !validators.insert(&entry.validator_address) {
            return Err(AttestationError::integrity(format!(
                "validator {} delegated more than once",
                entry.validator_address
            )));
        }
        if !orchestrators.insert(&entry.orchestrator_address) {
            return Err(AttestationError::integrity(format!(
                "orchestrator {} signs for more than one validator",
                entry.orchestrator_address
            )));
        }
    }

    let mut operations = Vec::with_capacity(keys.len() * 2);
    for entry in keys {
        operations.push(BatchOperation::put(
            orchestrator_validator_key(entry.orchestrator_address.as_bytes()),
            entry.validator_address.as_bytes(),
        ));
        operations.push(BatchOperation::put(
            ethereum_address_key(entry.validator_address.as_bytes()),
            entry.ethereum_address.to_checksum(),
        ));
    }
    Ok(operations)
}

impl<KV, PS, ES> DelegationRegistry for BridgeKeeper<KV, PS, ES>
where
    KV: KeyValueStore,
    PS: PowerSource,
    ES: EventSink,
{
    fn set_orchestrator_validator(
        &mut self,
        validator: &ValidatorAddress,
        orchestrator: &AccountAddress,
    ) -> AttestationResult<()> {
        self.store.put(
            &orchestrator_validator_key(orchestrator.as_bytes()),
            validator.as_bytes(),
        )?;
        tracing::info!("[qc-18] orchestrator {} signs for {}", orchestrator, validator);
        Ok(())
    }

    fn orchestrator_validator(
        &self,
        orchestrator: &AccountAddress,
    ) -> AttestationResult<Option<ValidatorAddress>> {
        Ok(self
            .store
            .get(&orchestrator_validator_key(orchestrator.as_bytes()))?
            .map(ValidatorAddress::new))
    }

    fn set_ethereum_address(
        &mut self,
        validator: &ValidatorAddress,
        address: &EthAddress,
    ) -> AttestationResult<()> {
        self.store.put(
            &ethereum_address_key(validator.as_bytes()),
            address.to_checksum().as_bytes(),
        )?;
        tracing::info!("[qc-18] validator {} uses ethereum key {}", validator, address);
        Ok(())
    }

    fn ethereum_address(
        &self,
        validator: &ValidatorAddress,
    ) -> AttestationResult<Option<EthAddress>> {
        self.store
            .get(&ethereum_address_key(validator.as_bytes()))?
            .map(|bytes| decode_eth_address(&bytes))
            .transpose()
    }

    fn delegate_keys(&self) -> AttestationResult<Vec<DelegateKeys>> {
        let mut orchestrators: BTreeMap<ValidatorAddress, AccountAddress> = BTreeMap::new();
        for (key, value) in self
            .store
            .prefix_scan(&KeyPrefix::OrchestratorValidator.scalar_key())?
        {
            let orchestrator = strip_prefix(KeyPrefix::OrchestratorValidator, &key)?;
            orchestrators.insert(ValidatorAddress::new(value), AccountAddress::new(orchestrator));
        }

        let mut keys = Vec::new();
        for (key, value) in self
            .store
            .prefix_scan(&KeyPrefix::ValidatorEthereumAddress.scalar_key())?
        {
            let validator =
                ValidatorAddress::new(strip_prefix(KeyPrefix::ValidatorEthereumAddress, &key)?);
            let ethereum_address = decode_eth_address(&value)?;
            let orchestrator_address = match orchestrators.get(&validator) {
                Some(orchestrator) => orchestrator.clone(),
                None => {
                    tracing::error!(
                        "[qc-18] validator {} has ethereum key {} but no orchestrator",
                        validator,
                        ethereum_address
                    );
                    return Err(AttestationError::integrity(format!(
                        "validator {} has an ethereum address but no orchestrator",
                        validator
                    )));
                }
            };
            keys.push(DelegateKeys {
                validator_address: validator,
                orchestrator_address,
                ethereum_address,
            });
        }

        keys.sort_by(|a, b| {
            a.ethereum_address
                .cmp(&b.ethereum_address)
                .then_with(|| a.validator_address.cmp(&b.validator_address))
        });
        Ok(keys)
    }

    fn import_delegate_keys(&mut self, keys: &[DelegateKeys]) -> AttestationResult<()> {
        let operations = delegate_key_operations(keys)?;
        self.store.atomic_batch_write(operations)?;
        tracing::info!("[qc-18] imported {} delegate keys", keys.len());
        Ok(())
    }
}
