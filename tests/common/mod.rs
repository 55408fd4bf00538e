//! A simulated IWDG and DBGMCU. Every register access is recorded, and the pending-update
//! flags behave like the hardware's: set by a PR or RLR write, and cleared after a number of
//! status reads.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use stm32_iwdg::regs::{DebugFreeze, IwdgRegs, KEY_ACCESS, SR_PVU, SR_RVU};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Key(u16),
    Prescaler(u8),
    Reload(u16),
}

pub struct SimIwdg {
    pub log: RefCell<Vec<Access>>,
    pr: Cell<u8>,
    rlr: Cell<u16>,
    unlocked: Cell<bool>,
    /// Remaining status reads that report PVU set.
    pvu_pending: Cell<u32>,
    /// Remaining status reads that report RVU set.
    rvu_pending: Cell<u32>,
    /// Status reads a PR or RLR write stays pending for.
    update_reads: u32,
    /// Flags that never clear, to model a stopped LSI.
    stuck: Cell<u32>,
    pub status_reads: Cell<u32>,
    /// Protected writes issued while their update flag was still set, or without access.
    pub violations: RefCell<Vec<&'static str>>,
}

impl SimIwdg {
    pub fn new() -> Self {
        Self::with_update_reads(3)
    }

    pub fn with_update_reads(update_reads: u32) -> Self {
        Self {
            log: RefCell::new(Vec::new()),
            // Reset values.
            pr: Cell::new(0),
            rlr: Cell::new(0xfff),
            unlocked: Cell::new(false),
            pvu_pending: Cell::new(0),
            rvu_pending: Cell::new(0),
            update_reads,
            stuck: Cell::new(0),
            status_reads: Cell::new(0),
            violations: RefCell::new(Vec::new()),
        }
    }

    /// Make the given status flags read as set forever.
    pub fn stick(&self, flags: u32) {
        self.stuck.set(flags);
    }

    /// Pretend an update is already in flight, for this many status reads.
    pub fn set_pending(&self, pvu_reads: u32, rvu_reads: u32) {
        self.pvu_pending.set(pvu_reads);
        self.rvu_pending.set(rvu_reads);
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.log.borrow().clone()
    }

    pub fn keys(&self) -> Vec<u16> {
        self.log
            .borrow()
            .iter()
            .filter_map(|a| match a {
                Access::Key(k) => Some(*k),
                _ => None,
            })
            .collect()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }
}

impl IwdgRegs for SimIwdg {
    fn write_key(&self, key: u16) {
        self.log.borrow_mut().push(Access::Key(key));
        // Any key other than the access key re-protects PR and RLR.
        self.unlocked.set(key == KEY_ACCESS);
    }

    fn status(&self) -> u32 {
        self.status_reads.set(self.status_reads.get() + 1);

        let mut sr = self.stuck.get();
        if self.pvu_pending.get() > 0 {
            self.pvu_pending.set(self.pvu_pending.get() - 1);
            sr |= SR_PVU;
        }
        if self.rvu_pending.get() > 0 {
            self.rvu_pending.set(self.rvu_pending.get() - 1);
            sr |= SR_RVU;
        }
        sr
    }

    fn write_prescaler(&self, bits: u8) {
        if self.pvu_pending.get() > 0 || self.stuck.get() & SR_PVU != 0 {
            self.violations.borrow_mut().push("PR written during update");
        }
        if !self.unlocked.get() {
            self.violations.borrow_mut().push("PR written while locked");
        }
        self.log.borrow_mut().push(Access::Prescaler(bits));
        self.pr.set(bits & 0b111);
        self.pvu_pending.set(self.update_reads);
    }

    fn write_reload(&self, value: u16) {
        if self.rvu_pending.get() > 0 || self.stuck.get() & SR_RVU != 0 {
            self.violations.borrow_mut().push("RLR written during update");
        }
        if !self.unlocked.get() {
            self.violations.borrow_mut().push("RLR written while locked");
        }
        self.log.borrow_mut().push(Access::Reload(value));
        self.rlr.set(value & 0xfff);
        self.rvu_pending.set(self.update_reads);
    }

    fn read_prescaler(&self) -> u8 {
        self.pr.get()
    }

    fn read_reload(&self) -> u16 {
        self.rlr.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbgAccess {
    ClockOn,
    ClockOff,
    Freeze,
}

#[derive(Default)]
pub struct SimDebug {
    pub log: Vec<DbgAccess>,
    pub clock_enabled: bool,
    pub iwdg_frozen: bool,
    /// Freeze-bit writes made while the clock was off; these would be lost on hardware.
    pub unclocked_writes: u32,
}

impl DebugFreeze for SimDebug {
    fn enable_clock(&mut self) {
        self.log.push(DbgAccess::ClockOn);
        self.clock_enabled = true;
    }

    fn disable_clock(&mut self) {
        self.log.push(DbgAccess::ClockOff);
        self.clock_enabled = false;
    }

    fn freeze_iwdg(&mut self) {
        self.log.push(DbgAccess::Freeze);
        if self.clock_enabled {
            self.iwdg_frozen = true;
        } else {
            self.unclocked_writes += 1;
        }
    }
}

/// A debug peripheral whose freeze write fails, to check the clock is still released.
#[derive(Default)]
pub struct FailingDebug {
    pub inner: SimDebug,
}

impl DebugFreeze for FailingDebug {
    fn enable_clock(&mut self) {
        self.inner.enable_clock();
    }

    fn disable_clock(&mut self) {
        self.inner.disable_clock();
    }

    fn freeze_iwdg(&mut self) {
        self.inner.log.push(DbgAccess::Freeze);
        panic!("DBGMCU write failed");
    }
}
