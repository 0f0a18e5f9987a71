//! Simulated jig
//!
//! Keeps the last value written to every output and derives readings
//! from that state, so a client session behaves like a bench session.

use crate::error::{JigError, Result};
use super::Hardware;

/// Number of readout cards on the jig
pub const NUM_CARDS: usize = 2;

/// TEC / HV / thermistor channels per card
pub const CHANNELS_PER_CARD: usize = 4;

pub const MAX_TEC_VOLTS: f64 = 5.0;
pub const MAX_HV_VOLTS: f64 = 60.0;

/// Room temperature the thermistors settle to with the TECs off
const AMBIENT_C: f64 = 22.0;

/// Cooling per volt of TEC drive
const TEC_C_PER_VOLT: f64 = -2.5;

/// Nominal TEC resistance
const TEC_OHMS: f64 = 14.0;

/// Bias supply load, so that I[uA] = V / LOAD_MOHM
const LOAD_MOHM: f64 = 2.0;

/// In-memory model of the jig electronics
#[derive(Debug, Clone)]
pub struct SimulatedJig {
    tec: [[f64; CHANNELS_PER_CARD]; NUM_CARDS],
    hv: [[f64; CHANNELS_PER_CARD]; NUM_CARDS],
    active_mask: u32,
    attenuation: u32,
    stepper_position: i64,
    polling: bool,
    debug: bool,
}

impl Default for SimulatedJig {
    fn default() -> Self {
        Self {
            tec: [[0.0; CHANNELS_PER_CARD]; NUM_CARDS],
            hv: [[0.0; CHANNELS_PER_CARD]; NUM_CARDS],
            active_mask: 0,
            attenuation: 0,
            stepper_position: 0,
            polling: false,
            debug: false,
        }
    }
}

impl SimulatedJig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tec_setpoint(&self, card: usize, channel: usize) -> Option<f64> {
        self.tec.get(card)?.get(channel).copied()
    }

    pub fn hv_setpoint(&self, card: usize, channel: usize) -> Option<f64> {
        self.hv.get(card)?.get(channel).copied()
    }

    pub fn active_mask(&self) -> u32 {
        self.active_mask
    }

    pub fn attenuation(&self) -> u32 {
        self.attenuation
    }

    pub fn stepper_position(&self) -> i64 {
        self.stepper_position
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    fn check_slot(card: usize, channel: usize) -> Result<()> {
        if card >= NUM_CARDS {
            return Err(JigError::Hardware(format!(
                "card {} out of range (0..{})",
                card, NUM_CARDS
            )));
        }
        if channel >= CHANNELS_PER_CARD {
            return Err(JigError::Hardware(format!(
                "channel {} out of range (0..{})",
                channel, CHANNELS_PER_CARD
            )));
        }
        Ok(())
    }

    fn check_volts(volts: f64, max: f64) -> Result<()> {
        if !volts.is_finite() || volts.abs() > max {
            return Err(JigError::Hardware(format!(
                "voltage {} outside +/-{} V",
                volts, max
            )));
        }
        Ok(())
    }
}

/// Two-decimal rounding, matching the resolution of the bench ADCs
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl Hardware for SimulatedJig {
    fn reset(&mut self) -> Result<()> {
        tracing::debug!("simulated jig reset");
        *self = Self::default();
        Ok(())
    }

    fn poll(&mut self, enabled: bool) -> Result<()> {
        self.polling = enabled;
        Ok(())
    }

    fn tec_write(&mut self, card: usize, channel: usize, volts: f64) -> Result<()> {
        Self::check_slot(card, channel)?;
        Self::check_volts(volts, MAX_TEC_VOLTS)?;
        self.tec[card][channel] = volts;
        Ok(())
    }

    fn hv_write(&mut self, card: usize, channel: usize, volts: f64) -> Result<()> {
        Self::check_slot(card, channel)?;
        if volts < 0.0 {
            return Err(JigError::Hardware(format!("negative bias voltage {}", volts)));
        }
        Self::check_volts(volts, MAX_HV_VOLTS)?;
        self.hv[card][channel] = volts;
        Ok(())
    }

    fn thermistor_read(&mut self, card: usize, channel: usize) -> Result<f64> {
        Self::check_slot(card, channel)?;
        Ok(round2(AMBIENT_C + TEC_C_PER_VOLT * self.tec[card][channel]))
    }

    fn tec_sense_read(&mut self, card: usize) -> Result<f64> {
        Self::check_slot(card, 0)?;
        let total: f64 = self.tec[card].iter().map(|v| v.abs()).sum();
        Ok(round2(total / CHANNELS_PER_CARD as f64))
    }

    fn tec_check(&mut self, card: usize, channel: usize) -> Result<f64> {
        Self::check_slot(card, channel)?;
        Ok(round2(TEC_OHMS + 0.1 * channel as f64))
    }

    fn set_active_bitmask(&mut self, mask: u32) -> Result<()> {
        self.active_mask = mask;
        Ok(())
    }

    fn debug(&mut self, enabled: bool) -> Result<()> {
        self.debug = enabled;
        Ok(())
    }

    fn set_attenuation(&mut self, value: u32) -> Result<()> {
        self.attenuation = value;
        Ok(())
    }

    fn step_home(&mut self) -> Result<()> {
        self.stepper_position = 0;
        Ok(())
    }

    fn step(&mut self, steps: i64) -> Result<()> {
        self.stepper_position = self
            .stepper_position
            .checked_add(steps)
            .ok_or_else(|| JigError::Hardware("stepper position overflow".to_string()))?;
        Ok(())
    }

    fn bias_iread(&mut self) -> Result<f64> {
        Ok(round2(self.bias_vread()? / LOAD_MOHM))
    }

    fn bias_vread(&mut self) -> Result<f64> {
        let max = self.hv.iter().flatten().copied().fold(0.0, f64::max);
        Ok(round2(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tec_drive_cools_thermistor() {
        let mut jig = SimulatedJig::new();
        assert_eq!(jig.thermistor_read(0, 1).unwrap(), 22.0);
        jig.tec_write(0, 1, 2.0).unwrap();
        assert_eq!(jig.thermistor_read(0, 1).unwrap(), 17.0);
        assert_eq!(jig.thermistor_read(1, 1).unwrap(), 22.0);
    }

    #[test]
    fn bias_readback_follows_hv_setpoint() {
        let mut jig = SimulatedJig::new();
        jig.hv_write(1, 3, 42.5).unwrap();
        assert_eq!(jig.bias_vread().unwrap(), 42.5);
        assert_eq!(jig.bias_iread().unwrap(), 21.25);
    }

    #[test]
    fn out_of_range_slot_is_hardware_error() {
        let mut jig = SimulatedJig::new();
        let err = jig.tec_write(NUM_CARDS, 0, 1.0).unwrap_err();
        assert!(matches!(err, JigError::Hardware(_)));
        assert!(jig.hv_write(0, CHANNELS_PER_CARD, 1.0).is_err());
        assert!(jig.hv_write(0, 0, MAX_HV_VOLTS + 1.0).is_err());
    }

    #[test]
    fn reset_clears_state() {
        let mut jig = SimulatedJig::new();
        jig.step(150).unwrap();
        jig.set_active_bitmask(0b1011).unwrap();
        jig.reset().unwrap();
        assert_eq!(jig.stepper_position(), 0);
        assert_eq!(jig.active_mask(), 0);
    }
}
