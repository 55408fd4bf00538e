//! Independent watchdog
//!
//! The IWDG is clocked by the LSI, and resets the MCU if its down-counter reaches zero. Once
//! started, it can't be stopped by software; the only way out is a reset. Feed it (`feed()`)
//! at an interval shorter than the countdown period to prevent that.
//!
//! L0x1 RM, section 24.3

use crate::{
    error::{Error, Result},
    regs::{DbgClockGuard, DebugFreeze, IwdgRegs, KEY_ACCESS, KEY_RELOAD, KEY_START, SR_PVU, SR_RVU},
    util::bounded_loop,
};

/// The reload register is 12 bits wide.
pub const MAX_RELOAD: u16 = 0xfff;

/// Errors associated with IWDG configuration.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IwdgError {
    /// The requested timeout is zero, or longer than the IWDG can count with any prescaler.
    TimeoutOutOfRange,
    /// The LSI frequency passed was zero.
    InvalidClock,
}

/// Divides the LSI clock before it reaches the counter. Sets the IWDG_PR register, PR field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IwdgPrescaler {
    Div4 = 0b000,
    Div8 = 0b001,
    Div16 = 0b010,
    Div32 = 0b011,
    Div64 = 0b100,
    Div128 = 0b101,
    Div256 = 0b110,
}

impl IwdgPrescaler {
    /// All prescalers, from the shortest period to the longest.
    pub const ALL: [Self; 7] = [
        Self::Div4,
        Self::Div8,
        Self::Div16,
        Self::Div32,
        Self::Div64,
        Self::Div128,
        Self::Div256,
    ];

    /// The division factor applied to the LSI clock.
    pub const fn divider(self) -> u32 {
        4 << (self as u32)
    }
}

/// Behaviour of the watchdog while the core is halted by a debugger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DebugMode {
    /// Keep counting while the core is halted.
    #[default]
    Continue = 0,
    /// Freeze the counter while the core is halted.
    Halt = 1,
}

/// Configuration applied when constructing an `Iwdg`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IwdgConfig {
    /// Countdown start value. Values above `MAX_RELOAD` are clamped.
    pub reload: u16,
    pub prescaler: IwdgPrescaler,
    pub debug_mode: DebugMode,
}

impl Default for IwdgConfig {
    fn default() -> Self {
        Self {
            reload: MAX_RELOAD,
            prescaler: IwdgPrescaler::Div32,
            debug_mode: DebugMode::Continue,
        }
    }
}

impl IwdgConfig {
    /// Select the shortest prescaler that can represent `timeout_us`, and the reload value
    /// that gets closest to it without exceeding it. `lsi_hz` is the LSI frequency; eg around
    /// 37kHz on L0, 32kHz on G0 and G4. Debug mode is left at its default.
    pub fn from_timeout_us(timeout_us: u64, lsi_hz: u32) -> Result<Self> {
        if lsi_hz == 0 {
            return Err(Error::IwdgError(IwdgError::InvalidClock));
        }
        if timeout_us == 0 {
            return Err(Error::IwdgError(IwdgError::TimeoutOutOfRange));
        }

        for prescaler in IwdgPrescaler::ALL {
            if timeout_us > period_us(prescaler, MAX_RELOAD, lsi_hz) {
                continue;
            }

            let ticks = timeout_us as u128 * lsi_hz as u128
                / (prescaler.divider() as u128 * 1_000_000);
            let reload = (ticks.saturating_sub(1) as u16).min(MAX_RELOAD);

            return Ok(Self {
                reload,
                prescaler,
                ..Default::default()
            });
        }

        Err(Error::IwdgError(IwdgError::TimeoutOutOfRange))
    }
}

/// Countdown period in microseconds, for a given prescaler, reload value and LSI frequency.
/// `lsi_hz` must be nonzero.
fn period_us(prescaler: IwdgPrescaler, reload: u16, lsi_hz: u32) -> u64 {
    ((reload as u128 + 1) * prescaler.divider() as u128 * 1_000_000 / lsi_hz as u128) as u64
}

/// Represents the Independent Watchdog peripheral. Owns its register block exclusively.
///
/// Concurrency: there's no internal synchronization. Don't call the configuration methods
/// from one context (eg an interrupt handler) while another is using the watchdog; the
/// unlock-then-write sequence isn't atomic across preemption.
pub struct Iwdg<R: IwdgRegs> {
    regs: R,
    prescaler: IwdgPrescaler,
    reload: u16,
    debug_mode: DebugMode,
}

impl<R: IwdgRegs> Iwdg<R> {
    /// Configure the watchdog: prescaler, then reload value (each write followed by a feed).
    /// If `cfg.debug_mode` is `Halt`, also freeze the watchdog while the core is halted; this
    /// turns on the debug peripheral's clock only for the duration of that write. In `Continue`
    /// mode, `dbg` isn't touched; if you never freeze the watchdog, `new_continue` doesn't
    /// need the debug peripheral at all.
    ///
    /// This doesn't start the countdown; call `start()` for that.
    ///
    /// Blocks until the hardware accepts the writes; see `set_prescaler`.
    pub fn new<D: DebugFreeze>(regs: R, cfg: IwdgConfig, dbg: &mut D) -> Self {
        let result = Self::configure(regs, cfg);

        if cfg.debug_mode == DebugMode::Halt {
            let mut dbg_clock = DbgClockGuard::new(dbg);
            dbg_clock.freeze_iwdg();
        }

        result
    }

    /// Configure the watchdog to keep counting while the core is halted. Same as `new` with
    /// `DebugMode::Continue`, without taking the debug peripheral.
    pub fn new_continue(regs: R, reload: u16, prescaler: IwdgPrescaler) -> Self {
        Self::configure(
            regs,
            IwdgConfig {
                reload,
                prescaler,
                debug_mode: DebugMode::Continue,
            },
        )
    }

    fn configure(regs: R, cfg: IwdgConfig) -> Self {
        let mut result = Self {
            regs,
            prescaler: cfg.prescaler,
            reload: cfg.reload.min(MAX_RELOAD),
            debug_mode: cfg.debug_mode,
        };

        result.set_prescaler(cfg.prescaler);
        result.set_reload_value(cfg.reload);

        result
    }

    /// Start the countdown. The watchdog counts down from the reload value, and resets the
    /// MCU if it reaches zero before being fed. Calling this again restarts the count.
    pub fn start(&mut self) {
        self.regs.write_key(KEY_START);
    }

    /// Reload the counter. Run this at an interval shorter than the countdown period to
    /// prevent a reset.
    pub fn feed(&mut self) {
        self.regs.write_key(KEY_RELOAD);
    }

    /// Set the clock prescaler, then feed.
    ///
    /// Spins until any previous prescaler update has completed, with no timeout. If the LSI
    /// isn't running, the update flag never clears and this never returns. Use
    /// `try_set_prescaler` if that's a concern.
    pub fn set_prescaler(&mut self, prescaler: IwdgPrescaler) {
        while self.regs.status() & SR_PVU != 0 {}

        self.write_prescaler(prescaler);
    }

    /// Set the reload value, then feed. Values above `MAX_RELOAD` are clamped.
    ///
    /// Spins until any previous reload update has completed, with no timeout; same caveat
    /// as `set_prescaler`.
    pub fn set_reload_value(&mut self, reload: u16) {
        while self.regs.status() & SR_RVU != 0 {}

        self.write_reload(reload);
    }

    /// Same as `set_prescaler`, but gives up if the previous update doesn't complete in time.
    /// Nothing is written in that case.
    pub fn try_set_prescaler(&mut self, prescaler: IwdgPrescaler) -> Result<()> {
        bounded_loop!(self.regs.status() & SR_PVU != 0, Error::RegisterUnchanged);

        self.write_prescaler(prescaler);
        Ok(())
    }

    /// Same as `set_reload_value`, but gives up if the previous update doesn't complete in
    /// time. Nothing is written in that case.
    pub fn try_set_reload_value(&mut self, reload: u16) -> Result<()> {
        bounded_loop!(self.regs.status() & SR_RVU != 0, Error::RegisterUnchanged);

        self.write_reload(reload);
        Ok(())
    }

    /// Returns true if a prescaler or reload update is still being applied by the hardware.
    pub fn is_updating(&self) -> bool {
        self.regs.status() & (SR_PVU | SR_RVU) != 0
    }

    pub fn prescaler(&self) -> IwdgPrescaler {
        self.prescaler
    }

    pub fn reload_value(&self) -> u16 {
        self.reload
    }

    pub fn debug_mode(&self) -> DebugMode {
        self.debug_mode
    }

    /// The countdown period, in microseconds, given the LSI frequency. Feed more often than
    /// this.
    pub fn timeout_us(&self, lsi_hz: u32) -> Result<u64> {
        if lsi_hz == 0 {
            return Err(Error::IwdgError(IwdgError::InvalidClock));
        }
        Ok(period_us(self.prescaler, self.reload, lsi_hz))
    }

    /// Release the register block. Hardware state is left as-is; if the watchdog is running,
    /// it keeps running.
    pub fn free(self) -> R {
        self.regs
    }

    /// Enable write access to PR and RLR until the next key write.
    fn access(&mut self) {
        self.regs.write_key(KEY_ACCESS);
    }

    fn write_prescaler(&mut self, prescaler: IwdgPrescaler) {
        self.access();
        self.regs.write_prescaler(prescaler as u8);
        self.prescaler = prescaler;

        self.feed();
    }

    fn write_reload(&mut self, reload: u16) {
        self.access();
        let reload = reload.min(MAX_RELOAD);
        self.regs.write_reload(reload);
        self.reload = reload;

        self.feed();
    }
}
