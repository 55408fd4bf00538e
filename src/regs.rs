//! Register-level access used by the watchdog driver. The driver talks to these traits instead
//! of the PAC directly, so it runs the same against the real peripheral or a simulated
//! register block.
//!
//! Reference: L0x1 RM, section 24.4 (IWDG registers) and section 33.9 (DBG registers).

#[cfg(hw)]
use cfg_if::cfg_if;
#[cfg(dbg_clock_gate)]
use cortex_m::interrupt::free;

#[cfg(dbg_clock_gate)]
use crate::pac::RCC;
#[cfg(hw)]
use crate::pac::{DBGMCU, IWDG};

/// Key register value that reloads the counter.
pub const KEY_RELOAD: u16 = 0xAAAA;
/// Key register value that enables write access to PR and RLR.
pub const KEY_ACCESS: u16 = 0x5555;
/// Key register value that starts the watchdog.
pub const KEY_START: u16 = 0xCCCC;

/// SR: Prescaler value update in progress.
pub const SR_PVU: u32 = 1 << 0;
/// SR: Reload value update in progress.
pub const SR_RVU: u32 = 1 << 1;

/// DBGMCU APB1 freeze register: stop the IWDG counter while the core is halted.
pub const DBG_IWDG_STOP: u32 = 1 << 12;

// RCC bit that clocks the DBGMCU peripheral.
#[cfg(feature = "l0")]
const RCC_DBGEN: u32 = 1 << 22; // APB2ENR
#[cfg(feature = "g0")]
const RCC_DBGEN: u32 = 1 << 27; // APBENR1

/// The capability set the driver needs from an IWDG register block: write the key register,
/// read status, and read or write the prescaler and reload fields.
///
/// Methods take `&self`, like PAC register accessors; the backing store is volatile memory
/// (or interior mutability, for a simulated block).
pub trait IwdgRegs {
    /// Write a value to the key register (KR).
    fn write_key(&self, key: u16);

    /// Read the raw status register (SR). See `SR_PVU` and `SR_RVU`.
    fn status(&self) -> u32;

    /// Write the 3-bit prescaler field (PR).
    fn write_prescaler(&self, bits: u8);

    /// Write the 12-bit reload field (RLR).
    fn write_reload(&self, value: u16);

    /// Read the prescaler field (PR).
    fn read_prescaler(&self) -> u8;

    /// Read the reload field (RLR).
    fn read_reload(&self) -> u16;
}

// Lets a caller keep a shared handle to the block while the driver uses it.
impl<T: IwdgRegs + ?Sized> IwdgRegs for &T {
    fn write_key(&self, key: u16) {
        (**self).write_key(key)
    }

    fn status(&self) -> u32 {
        (**self).status()
    }

    fn write_prescaler(&self, bits: u8) {
        (**self).write_prescaler(bits)
    }

    fn write_reload(&self, value: u16) {
        (**self).write_reload(value)
    }

    fn read_prescaler(&self) -> u8 {
        (**self).read_prescaler()
    }

    fn read_reload(&self) -> u16 {
        (**self).read_reload()
    }
}

/// Access to the debug support peripheral's freeze configuration, and to the clock that feeds
/// it. Only used when the watchdog is configured to stop while the core is halted.
pub trait DebugFreeze {
    /// Enable the debug peripheral's clock.
    fn enable_clock(&mut self);

    /// Disable the debug peripheral's clock.
    fn disable_clock(&mut self);

    /// Set the bit that freezes the IWDG counter while the core is halted.
    fn freeze_iwdg(&mut self);
}

/// Scoped access to the debug peripheral: its clock is enabled on creation, and disabled
/// when this is dropped.
pub struct DbgClockGuard<'a, D: DebugFreeze> {
    dbg: &'a mut D,
}

impl<'a, D: DebugFreeze> DbgClockGuard<'a, D> {
    /// Enable the debug peripheral's clock. It stays on until the guard is dropped, including
    /// by unwinding.
    pub fn new(dbg: &'a mut D) -> Self {
        dbg.enable_clock();
        Self { dbg }
    }

    /// Freeze the IWDG while the core is halted.
    pub fn freeze_iwdg(&mut self) {
        self.dbg.freeze_iwdg();
    }
}

impl<D: DebugFreeze> Drop for DbgClockGuard<'_, D> {
    fn drop(&mut self) {
        self.dbg.disable_clock();
    }
}

#[cfg(hw)]
impl IwdgRegs for IWDG {
    fn write_key(&self, key: u16) {
        self.kr().write(|w| unsafe { w.bits(key as u32) });
    }

    fn status(&self) -> u32 {
        self.sr().read().bits()
    }

    fn write_prescaler(&self, bits: u8) {
        self.pr().write(|w| unsafe { w.bits(bits as u32) });
    }

    fn write_reload(&self, value: u16) {
        self.rlr().write(|w| unsafe { w.bits(value as u32) });
    }

    fn read_prescaler(&self) -> u8 {
        (self.pr().read().bits() & 0b111) as u8
    }

    fn read_reload(&self) -> u16 {
        (self.rlr().read().bits() & 0xfff) as u16
    }
}

/// Represents the MCU's debug support (DBGMCU) peripheral.
#[cfg(hw)]
pub struct McuDebug {
    pub regs: DBGMCU,
}

#[cfg(hw)]
impl McuDebug {
    pub fn new(regs: DBGMCU) -> Self {
        Self { regs }
    }
}

#[cfg(hw)]
impl DebugFreeze for McuDebug {
    fn enable_clock(&mut self) {
        // RCC is shared with every other peripheral; keep the read-modify-write atomic.
        #[cfg(dbg_clock_gate)]
        free(|_| {
            let rcc = unsafe { &(*RCC::ptr()) };

            cfg_if! {
                if #[cfg(feature = "l0")] {
                    rcc.apb2enr().modify(|r, w| unsafe { w.bits(r.bits() | RCC_DBGEN) });
                } else {
                    rcc.apbenr1().modify(|r, w| unsafe { w.bits(r.bits() | RCC_DBGEN) });
                }
            }
        });
    }

    fn disable_clock(&mut self) {
        #[cfg(dbg_clock_gate)]
        free(|_| {
            let rcc = unsafe { &(*RCC::ptr()) };

            cfg_if! {
                if #[cfg(feature = "l0")] {
                    rcc.apb2enr().modify(|r, w| unsafe { w.bits(r.bits() & !RCC_DBGEN) });
                } else {
                    rcc.apbenr1().modify(|r, w| unsafe { w.bits(r.bits() & !RCC_DBGEN) });
                }
            }
        });
    }

    fn freeze_iwdg(&mut self) {
        cfg_if! {
            if #[cfg(any(feature = "l0", feature = "f4"))] {
                self.regs.apb1_fz().modify(|r, w| unsafe { w.bits(r.bits() | DBG_IWDG_STOP) });
            } else if #[cfg(feature = "g0")] {
                self.regs.apb_fz1().modify(|r, w| unsafe { w.bits(r.bits() | DBG_IWDG_STOP) });
            } else {
                self.regs.apb1fzr1().modify(|r, w| unsafe { w.bits(r.bits() | DBG_IWDG_STOP) });
            }
        }
    }
}
