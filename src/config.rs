//! Defines the register values sent to the SSD1331 during initialization.

use crate::command::*;
use crate::error::Error;
use crate::interface;

/// A configuration for the display. Every register starts at the value known to work with the
/// common 96x64 modules; builder methods override individual registers. All values are checked
/// when `Display::init` sends them.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    mux_ratio: u8,
    power_save: bool,
    phase_lengths: (u8, u8),
    clock_fosc_divset: (u8, u8),
    second_precharge: [u8; 3],
    precharge_level: u8,
    vcomh: u8,
    master_current: u8,
    contrast: [u8; 3],
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mux_ratio: consts::NUM_PIXEL_ROWS,
            power_save: false,
            phase_lengths: (1, 3),
            clock_fosc_divset: (15, 0),
            second_precharge: [0x64, 0x78, 0x64],
            precharge_level: 0x3A,
            vcomh: 0x3E,
            master_current: 0x06,
            contrast: [0x91, 0x50, 0x7D],
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the per-channel contrast currents. See `Command::SetContrast`.
    pub fn contrast(self, a: u8, b: u8, c: u8) -> Self {
        Self {
            contrast: [a, b, c],
            ..self
        }
    }

    /// Override the master current attenuation. See `Command::SetMasterCurrent`.
    pub fn master_current(self, current: u8) -> Self {
        Self {
            master_current: current,
            ..self
        }
    }

    /// Override the phase 1 and phase 2 periods. See `Command::SetPhaseLengths`.
    pub fn phase_lengths(self, phase_1: u8, phase_2: u8) -> Self {
        Self {
            phase_lengths: (phase_1, phase_2),
            ..self
        }
    }

    /// Override the oscillator frequency and clock divider. See `Command::SetClockFoscDivset`.
    pub fn clock_fosc_divset(self, fosc: u8, divset: u8) -> Self {
        Self {
            clock_fosc_divset: (fosc, divset),
            ..self
        }
    }

    /// Override the per-channel second precharge speeds. See `Command::SetSecondPrecharge`.
    pub fn second_precharge(self, a: u8, b: u8, c: u8) -> Self {
        Self {
            second_precharge: [a, b, c],
            ..self
        }
    }

    /// Override the precharge voltage level. See `Command::SetPrechargeLevel`.
    pub fn precharge_level(self, level: u8) -> Self {
        Self {
            precharge_level: level,
            ..self
        }
    }

    /// Override the COM deselect voltage level. See `Command::SetVcomh`.
    pub fn vcomh(self, level: u8) -> Self {
        Self {
            vcomh: level,
            ..self
        }
    }

    /// Override the MUX ratio, for modules with fewer than 64 rows. See `Command::SetMuxRatio`.
    pub fn mux_ratio(self, ratio: u8) -> Self {
        Self {
            mux_ratio: ratio,
            ..self
        }
    }

    /// Enable or disable power save mode. See `Command::SetPowerSave`.
    pub fn power_save(self, enabled: bool) -> Self {
        Self {
            power_save: enabled,
            ..self
        }
    }

    /// Transmit the register commands of this configuration, in the order the controller
    /// expects them between remap setup and display on.
    pub(crate) fn send<DI>(&self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: interface::DisplayInterface,
    {
        let channels = [ColorChannel::A, ColorChannel::B, ColorChannel::C];
        Command::SetMuxRatio(self.mux_ratio).send(iface)?;
        Command::SetMasterConfiguration.send(iface)?;
        Command::SetPowerSave(self.power_save).send(iface)?;
        Command::SetPhaseLengths(self.phase_lengths.0, self.phase_lengths.1).send(iface)?;
        Command::SetClockFoscDivset(self.clock_fosc_divset.0, self.clock_fosc_divset.1)
            .send(iface)?;
        for (&channel, &speed) in channels.iter().zip(self.second_precharge.iter()) {
            Command::SetSecondPrecharge(channel, speed).send(iface)?;
        }
        Command::SetPrechargeLevel(self.precharge_level).send(iface)?;
        Command::SetVcomh(self.vcomh).send(iface)?;
        Command::SetMasterCurrent(self.master_current).send(iface)?;
        for (&channel, &contrast) in channels.iter().zip(self.contrast.iter()) {
            Command::SetContrast(channel, contrast).send(iface)?;
        }
        Ok(())
    }
}
