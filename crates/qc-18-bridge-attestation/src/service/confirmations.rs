//! # Confirmation Ledger Implementation

use super::*;
use crate::domain::keys::{ethereum_signature_key, ethereum_signature_prefix};
use crate::domain::{AttestationError, AttestationResult, StoreIndex, ValidatorAddress};
use crate::ports::inbound::ConfirmationLedger;
use std::collections::BTreeMap;

impl<KV, PS, ES> ConfirmationLedger for BridgeKeeper<KV, PS, ES>
where
    KV: KeyValueStore,
    PS: PowerSource,
    ES: EventSink,
{
    fn put_confirmation(
        &mut self,
        index: &StoreIndex,
        validator: &ValidatorAddress,
        signature: &[u8],
    ) -> AttestationResult<Vec<u8>> {
        let key = ethereum_signature_key(index.as_bytes(), validator.as_bytes());
        self.store.put(&key, signature)?;
        tracing::debug!("[qc-18] confirmation of {} by {}", index, validator);
        Ok(key)
    }

    fn confirmation(
        &self,
        index: &StoreIndex,
        validator: &ValidatorAddress,
    ) -> AttestationResult<Option<Vec<u8>>> {
        let key = ethereum_signature_key(index.as_bytes(), validator.as_bytes());
        Ok(self.store.get(&key)?)
    }

    fn has_confirmation(
        &self,
        index: &StoreIndex,
        validator: &ValidatorAddress,
    ) -> AttestationResult<bool> {
        let key = ethereum_signature_key(index.as_bytes(), validator.as_bytes());
        Ok(self.store.exists(&key)?)
    }

    fn delete_confirmation(
        &mut self,
        index: &StoreIndex,
        validator: &ValidatorAddress,
    ) -> AttestationResult<()> {
        let key = ethereum_signature_key(index.as_bytes(), validator.as_bytes());
        self.store.delete(&key)?;
        Ok(())
    }

    fn confirmations_for(
        &self,
        index: &StoreIndex,
    ) -> AttestationResult<BTreeMap<ValidatorAddress, Vec<u8>>> {
        let mut confirmations = BTreeMap::new();
        self.iterate_confirmations(index, &mut |validator, signature| {
            confirmations.insert(validator.clone(), signature.to_vec());
            false
        })?;
        Ok(confirmations)
    }

    fn iterate_confirmations(
        &self,
        index: &StoreIndex,
        visitor: &mut dyn FnMut(&ValidatorAddress, &[u8]) -> bool,
    ) -> AttestationResult<()> {
        let prefix = ethereum_signature_prefix(index.as_bytes());
        // Store indices are prefix-free: every key here belongs to `index`
        for (key, signature) in self.store.prefix_scan(&prefix)? {
            let validator = &key[prefix.len()..];
            if validator.is_empty() {
                return Err(AttestationError::integrity(format!(
                    "confirmation of {} without validator",
                    index
                )));
            }
            if visitor(&ValidatorAddress::new(validator), &signature) {
                break;
            }
        }
        Ok(())
    }
}
