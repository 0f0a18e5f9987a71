//! Hardware Module
//!
//! The jig electronics seen by the command handlers.
//!
//! ## Responsibilities
//! - One method per jig operation (TEC, HV, thermistors, stepper, bias)
//! - Serialized access: handlers share one `SharedHardware` and lock it
//!   for the duration of a call, so at most one operation touches the
//!   bench at a time
//! - `SimulatedJig` stands in for the Teensy when no board is attached

mod simulated;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

pub use simulated::{SimulatedJig, CHANNELS_PER_CARD, MAX_HV_VOLTS, MAX_TEC_VOLTS, NUM_CARDS};

/// Hardware shared by every handler of a command table
pub type SharedHardware = Arc<Mutex<dyn Hardware>>;

/// Wrap a hardware implementation for use by a command table
pub fn shared<H: Hardware + 'static>(hardware: H) -> SharedHardware {
    Arc::new(Mutex::new(hardware))
}

/// Operations exposed by the jig electronics
///
/// Implementations are not expected to be reentrant; callers serialize
/// access through `SharedHardware`.
pub trait Hardware: Send {
    /// Return every output to its power-on state
    fn reset(&mut self) -> Result<()>;

    /// Enable or disable periodic sensor polling
    fn poll(&mut self, enabled: bool) -> Result<()>;

    /// Set a TEC drive voltage
    fn tec_write(&mut self, card: usize, channel: usize, volts: f64) -> Result<()>;

    /// Set an SiPM bias (HV) voltage
    fn hv_write(&mut self, card: usize, channel: usize, volts: f64) -> Result<()>;

    /// Read a thermistor temperature in degrees C
    fn thermistor_read(&mut self, card: usize, channel: usize) -> Result<f64>;

    /// Read the TEC sense voltage of a card
    fn tec_sense_read(&mut self, card: usize) -> Result<f64>;

    /// Measure a TEC resistance in ohms
    fn tec_check(&mut self, card: usize, channel: usize) -> Result<f64>;

    /// Select which modules are active
    fn set_active_bitmask(&mut self, mask: u32) -> Result<()>;

    fn debug(&mut self, enabled: bool) -> Result<()>;

    /// Set the laser attenuator position
    fn set_attenuation(&mut self, value: u32) -> Result<()>;

    /// Drive the stepper to its home switch
    fn step_home(&mut self) -> Result<()>;

    /// Move the stepper by a signed number of steps
    fn step(&mut self, steps: i64) -> Result<()>;

    /// Read the bias supply current in microamps
    fn bias_iread(&mut self) -> Result<f64>;

    /// Read the bias supply voltage in volts
    fn bias_vread(&mut self) -> Result<f64>;
}
