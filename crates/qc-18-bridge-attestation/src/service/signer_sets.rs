//! # Signer Set Store Implementation
//!
//! Signer set persistence plus the power snapshot trigger.

use super::*;
use crate::algorithms::build_signer_set;
use crate::codec::encode_record;
use crate::domain::keys::{signer_set_key, u64_to_be_bytes};
use crate::domain::{
    AttestationError, AttestationEvent, AttestationResult, KeyPrefix, KeyRange, SignerSetTx,
    ValidatorAddress,
};
use crate::ports::inbound::{ConfirmationLedger, DelegationRegistry, SignerSetStore};
use crate::ports::outbound::{BatchOperation, ScanOrder};

impl<KV, PS, ES> BridgeKeeper<KV, PS, ES>
where
    KV: KeyValueStore,
    PS: PowerSource,
    ES: EventSink,
{
    /// Signer set for `height` derived from current power and registered addresses.
    pub fn current_signer_set(&self, height: u64) -> AttestationResult<SignerSetTx> {
        let powers = self.power_source.validator_powers()?;
        build_signer_set(height, &powers, |validator| self.ethereum_address(validator))
    }

    /// Build, store and announce the signer set for `height`.
    pub fn create_signer_set_request(&mut self, height: u64) -> AttestationResult<SignerSetTx> {
        let contract = self.config.params.contract_address()?;
        let set = self.current_signer_set(height)?;
        self.put_signer_set(&set)?;

        self.events.emit(AttestationEvent::SignerSetRequested {
            contract,
            chain_id: self.config.params.bridge_chain_id,
            nonce: set.nonce,
        });
        tracing::info!(
            "[qc-18] signer set #{} requested with {} members",
            set.nonce,
            set.members.len()
        );
        Ok(set)
    }

    /// The newest signer sets shown to relayers.
    pub fn recent_signer_sets_for_relay(&self) -> AttestationResult<Vec<SignerSetTx>> {
        self.recent_signer_sets(self.config.recent_signer_set_count)
    }

    fn write_signer_set(&mut self, set: &SignerSetTx) -> AttestationResult<()> {
        let record = encode_record("signer set", set)?;
        self.store.atomic_batch_write(vec![
            BatchOperation::put(signer_set_key(set.nonce), record),
            BatchOperation::put(
                KeyPrefix::LatestSignerSetNonce.scalar_key(),
                u64_to_be_bytes(set.nonce).to_vec(),
            ),
        ])?;
        tracing::info!(
            "[qc-18] stored signer set #{} (height {}, total power {})",
            set.nonce,
            set.height,
            set.total_power()
        );
        Ok(())
    }
}

impl<KV, PS, ES> SignerSetStore for BridgeKeeper<KV, PS, ES>
where
    KV: KeyValueStore,
    PS: PowerSource,
    ES: EventSink,
{
    fn put_signer_set(&mut self, set: &SignerSetTx) -> AttestationResult<()> {
        let latest = self.latest_signer_set_nonce()?;
        // nonce 0 is only taken once something was stored under it
        let taken = latest != 0 || self.has_signer_set(0)?;
        if taken && set.nonce <= latest {
            tracing::warn!(
                "[qc-18] rejected signer set #{}: latest is #{}",
                set.nonce,
                latest
            );
            return Err(AttestationError::NonceRegression {
                nonce: set.nonce,
                latest,
            });
        }
        self.write_signer_set(set)
    }

    fn put_signer_set_unchecked(&mut self, set: &SignerSetTx) -> AttestationResult<()> {
        self.write_signer_set(set)
    }

    fn signer_set(&self, nonce: u64) -> AttestationResult<Option<SignerSetTx>> {
        let key = signer_set_key(nonce);
        match self.store.get(&key)? {
            Some(bytes) => Ok(Some(Self::decode_signer_set_entry(&key, &bytes)?)),
            None => Ok(None),
        }
    }

    fn has_signer_set(&self, nonce: u64) -> AttestationResult<bool> {
        Ok(self.store.exists(&signer_set_key(nonce))?)
    }

    fn delete_signer_set(&mut self, nonce: u64) -> AttestationResult<()> {
        self.store.delete(&signer_set_key(nonce))?;
        tracing::info!("[qc-18] deleted signer set #{}", nonce);
        Ok(())
    }

    fn latest_signer_set(&self) -> AttestationResult<Option<SignerSetTx>> {
        self.signer_set(self.latest_signer_set_nonce()?)
    }

    fn latest_signer_set_nonce(&self) -> AttestationResult<u64> {
        self.read_counter(KeyPrefix::LatestSignerSetNonce)
    }

    fn iterate_signer_sets(
        &self,
        visitor: &mut dyn FnMut(&SignerSetTx) -> bool,
    ) -> AttestationResult<()> {
        self.for_each_signer_set(
            &KeyPrefix::SignerSetTx.range(),
            ScanOrder::Descending,
            &mut |set| Ok(visitor(&set)),
        )
    }

    fn signer_sets_descending(&self) -> AttestationResult<Vec<SignerSetTx>> {
        let mut sets = Vec::new();
        self.for_each_signer_set(
            &KeyPrefix::SignerSetTx.range(),
            ScanOrder::Descending,
            &mut |set| {
                sets.push(set);
                Ok(false)
            },
        )?;
        Ok(sets)
    }

    fn unslashed_signer_sets(&self, max_height: u64) -> AttestationResult<Vec<SignerSetTx>> {
        let last_slashed = self.last_slashed_signer_set_nonce()?;
        let range = KeyRange::new(
            Some(signer_set_key(last_slashed)),
            Some(signer_set_key(max_height)),
        );
        let mut sets = Vec::new();
        self.for_each_signer_set(&range, ScanOrder::Ascending, &mut |set| {
            if set.nonce > last_slashed {
                sets.push(set);
            }
            Ok(false)
        })?;
        tracing::debug!(
            "[qc-18] {} unslashed signer sets below height {}",
            sets.len(),
            max_height
        );
        Ok(sets)
    }

    fn set_last_slashed_signer_set_nonce(&mut self, nonce: u64) -> AttestationResult<()> {
        self.advance_counter(
            KeyPrefix::LastSlashedSignerSetNonce,
            "last_slashed_signer_set_nonce",
            nonce,
        )?;
        tracing::info!("[qc-18] last slashed signer set nonce is now {}", nonce);
        Ok(())
    }

    fn last_slashed_signer_set_nonce(&self) -> AttestationResult<u64> {
        self.read_counter(KeyPrefix::LastSlashedSignerSetNonce)
    }

    fn set_last_unbonding_block_height(&mut self, height: u64) -> AttestationResult<()> {
        self.advance_counter(
            KeyPrefix::LastUnbondingBlockHeight,
            "last_unbonding_block_height",
            height,
        )
    }

    fn last_unbonding_block_height(&self) -> AttestationResult<u64> {
        self.read_counter(KeyPrefix::LastUnbondingBlockHeight)
    }

    fn recent_signer_sets(&self, count: usize) -> AttestationResult<Vec<SignerSetTx>> {
        let mut sets = Vec::with_capacity(count.min(64));
        if count == 0 {
            return Ok(sets);
        }
        self.for_each_signer_set(
            &KeyPrefix::SignerSetTx.range(),
            ScanOrder::Descending,
            &mut |set| {
                sets.push(set);
                Ok(sets.len() >= count)
            },
        )?;
        Ok(sets)
    }

    fn signer_sets_unsigned_by(
        &self,
        validator: &ValidatorAddress,
    ) -> AttestationResult<Vec<SignerSetTx>> {
        let mut unsigned = Vec::new();
        self.for_each_signer_set(
            &KeyPrefix::SignerSetTx.range(),
            ScanOrder::Descending,
            &mut |set| {
                if !self.has_confirmation(&set.store_index(), validator)? {
                    unsigned.push(set);
                }
                Ok(false)
            },
        )?;
        Ok(unsigned)
    }
}
