//! # Bridge Keeper
//!
//! The service implementing every attestation port.
//!
//! ## Architecture
//!
//! `BridgeKeeper`:
//! 1. Implements `SignerSetStore`, `ConfirmationLedger`, `OutgoingTxQueue`
//!    and `DelegationRegistry` over one `KeyValueStore`
//! 2. Builds signer sets from a `PowerSource`
//! 3. Reports new signer sets and queued transactions on an `EventSink`
//!
//! The keeper holds no state outside the store, so a `StagedStore` makes a
//! whole step atomic.

mod confirmations;
mod delegation;
mod helpers;
mod outgoing;
mod signer_sets;
mod snapshot;

use crate::adapters::{InMemoryKVStore, RecordingEventSink, StaticPowerSource};
use crate::codec::KindRegistry;
use crate::config::AttestationConfig;
use crate::ports::outbound::{EventSink, KeyValueStore, PowerSource};

/// The Bridge Attestation service.
pub struct BridgeKeeper<KV, PS, ES>
where
    KV: KeyValueStore,
    PS: PowerSource,
    ES: EventSink,
{
    /// Key-value store holding the whole attestation keyspace.
    pub(crate) store: KV,
    /// Current validator power.
    pub(crate) power_source: PS,
    /// Event output.
    pub(crate) events: ES,
    /// Outgoing tx payload codecs.
    pub(crate) registry: KindRegistry,
    /// Service configuration.
    pub(crate) config: AttestationConfig,
}

/// Dependencies for BridgeKeeper
pub struct BridgeDependencies<KV, PS, ES> {
    /// Key-value store
    pub store: KV,
    /// Validator power
    pub power_source: PS,
    /// Event output
    pub events: ES,
    /// Outgoing tx codecs
    pub registry: KindRegistry,
}

impl<KV, PS, ES> BridgeKeeper<KV, PS, ES>
where
    KV: KeyValueStore,
    PS: PowerSource,
    ES: EventSink,
{
    /// Create a keeper over the given dependencies.
    pub fn new(deps: BridgeDependencies<KV, PS, ES>, config: AttestationConfig) -> Self {
        Self {
            store: deps.store,
            power_source: deps.power_source,
            events: deps.events,
            registry: deps.registry,
            config,
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &AttestationConfig {
        &self.config
    }

    /// Underlying store.
    pub fn store(&self) -> &KV {
        &self.store
    }

    /// Event sink.
    pub fn events(&self) -> &ES {
        &self.events
    }

    /// Mutable event sink.
    pub fn events_mut(&mut self) -> &mut ES {
        &mut self.events
    }

    /// Power source.
    pub fn power_source_mut(&mut self) -> &mut PS {
        &mut self.power_source
    }

    /// Give back the store, e.g. to commit a staged step.
    pub fn into_store(self) -> KV {
        self.store
    }
}

impl BridgeKeeper<InMemoryKVStore, StaticPowerSource, RecordingEventSink> {
    /// Keeper over an empty in-memory store.
    pub fn new_in_memory(power_source: StaticPowerSource, config: AttestationConfig) -> Self {
        Self::new(
            BridgeDependencies {
                store: InMemoryKVStore::new(),
                power_source,
                events: RecordingEventSink::new(),
                registry: KindRegistry::default(),
            },
            config,
        )
    }
}
