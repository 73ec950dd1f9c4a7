//! # Power Normalization
//!
//! Builds a signer set from raw validator power.
//!
//! Each member receives `floor(p * (2^32 - 1) / total)`. The arithmetic is
//! exact unsigned integer math in `u128`, so every node derives the same
//! set. Rounding loses at most one unit per member and the normalized sum
//! never exceeds `u32::MAX`.

use crate::domain::{
    AttestationError, AttestationResult, EthAddress, EthereumSigner, SignerSetTx, ValidatorAddress,
    ValidatorPower,
};

/// Upper bound of the normalized power sum.
pub const MAX_NORMALIZED_POWER: u64 = u32::MAX as u64;

/// Normalize one raw power against the set total.
///
/// `power <= total` must hold; the result then fits in `u32`.
pub fn normalize_power(power: u64, total: u128) -> AttestationResult<u32> {
    if total == 0 {
        return Err(AttestationError::ZeroTotalPower);
    }
    let scaled = u128::from(power) * u128::from(MAX_NORMALIZED_POWER) / total;
    u32::try_from(scaled).map_err(|_| {
        AttestationError::integrity(format!(
            "validator power {} exceeds total power {}",
            power, total
        ))
    })
}

/// Build the signer set for `height`.
///
/// Members keep the order of `powers`. `address_lookup` resolves each
/// validator's foreign address.
pub fn build_signer_set<F>(
    height: u64,
    powers: &[ValidatorPower],
    mut address_lookup: F,
) -> AttestationResult<SignerSetTx>
where
    F: FnMut(&ValidatorAddress) -> AttestationResult<Option<EthAddress>>,
{
    let total: u128 = powers.iter().map(|vp| u128::from(vp.power)).sum();
    if total == 0 {
        return Err(AttestationError::ZeroTotalPower);
    }

    let mut members = Vec::with_capacity(powers.len());
    for vp in powers {
        members.push(EthereumSigner {
            ethereum_address: address_lookup(&vp.validator)?,
            power: normalize_power(vp.power, total)?,
        });
    }

    Ok(SignerSetTx::new(height, height, members))
}
