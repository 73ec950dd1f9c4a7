//! Fixed validator power table.

use crate::domain::{AttestationResult, ValidatorAddress, ValidatorPower};
use crate::ports::outbound::PowerSource;

/// `PowerSource` returning a configured table in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaticPowerSource {
    powers: Vec<ValidatorPower>,
}

impl StaticPowerSource {
    /// Source over a fixed table.
    pub fn new(powers: Vec<ValidatorPower>) -> Self {
        Self { powers }
    }

    /// Append a validator.
    pub fn with_validator(mut self, validator: ValidatorAddress, power: u64) -> Self {
        self.powers.push(ValidatorPower::new(validator, power));
        self
    }

    /// Replace the power of `validator`, appending it when absent.
    pub fn set_power(&mut self, validator: ValidatorAddress, power: u64) {
        match self.powers.iter_mut().find(|vp| vp.validator == validator) {
            Some(entry) => entry.power = power,
            None => self.powers.push(ValidatorPower::new(validator, power)),
        }
    }
}

impl PowerSource for StaticPowerSource {
    fn validator_powers(&self) -> AttestationResult<Vec<ValidatorPower>> {
        Ok(self.powers.clone())
    }
}
