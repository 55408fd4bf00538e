//! This library provides a driver for the Independent Watchdog (IWDG) peripheral found on
//! STM32 MCUs. It configures the prescaler and reload value, starts the countdown, and
//! lets you feed the watchdog to prevent a reset. It can optionally freeze the watchdog
//! while the core is halted by a debugger.
//!
//! Select your MCU with a Cargo feature, eg `l0x1` or `g071`. If the program is meant to be
//! flashed directly, also enable the family runtime feature, eg `l0rt`.
//!
//! Example:
//! ```ignore
//! use stm32_iwdg::{
//!     iwdg::{DebugMode, Iwdg, IwdgConfig, IwdgPrescaler},
//!     pac,
//!     regs::McuDebug,
//! };
//!
//! let dp = pac::Peripherals::take().unwrap();
//! let mut dbg = McuDebug::new(dp.DBGMCU);
//!
//! let cfg = IwdgConfig {
//!     reload: 1_000,
//!     prescaler: IwdgPrescaler::Div32,
//!     debug_mode: DebugMode::Halt,
//! };
//! let mut wdg = Iwdg::new(dp.IWDG, cfg, &mut dbg);
//! wdg.start();
//!
//! loop {
//!     // Do work, then:
//!     wdg.feed();
//! }
//! ```

#![cfg_attr(not(test), no_std)]

use cfg_if::cfg_if;

// F4 PAC
#[cfg(feature = "f401")]
pub use stm32f4::stm32f401 as pac;

#[cfg(feature = "f405")]
pub use stm32f4::stm32f405 as pac;

#[cfg(feature = "f407")]
pub use stm32f4::stm32f407 as pac;

#[cfg(feature = "f411")]
pub use stm32f4::stm32f411 as pac;

#[cfg(feature = "f446")]
pub use stm32f4::stm32f446 as pac;

// L0 PAC
#[cfg(feature = "l0x0")]
pub use stm32l0::stm32l0x0 as pac;

#[cfg(feature = "l0x1")]
pub use stm32l0::stm32l0x1 as pac;

#[cfg(feature = "l0x2")]
pub use stm32l0::stm32l0x2 as pac;

#[cfg(feature = "l0x3")]
pub use stm32l0::stm32l0x3 as pac;

// L4 PAC
#[cfg(feature = "l4x1")]
pub use stm32l4::stm32l4x1 as pac;

#[cfg(feature = "l4x2")]
pub use stm32l4::stm32l4x2 as pac;

#[cfg(feature = "l4x3")]
pub use stm32l4::stm32l4x3 as pac;

#[cfg(feature = "l4x5")]
pub use stm32l4::stm32l4x5 as pac;

#[cfg(feature = "l4x6")]
pub use stm32l4::stm32l4x6 as pac;

// G0 PAC
cfg_if! {
    if #[cfg(feature = "g030")] {
        pub use stm32g0::stm32g030 as pac;
    } else if #[cfg(feature = "g031")] {
        pub use stm32g0::stm32g031 as pac;
    } else if #[cfg(feature = "g041")] {
        pub use stm32g0::stm32g041 as pac;
    } else if #[cfg(feature = "g070")] {
        pub use stm32g0::stm32g070 as pac;
    } else if #[cfg(feature = "g071")] {
        pub use stm32g0::stm32g071 as pac;
    } else if #[cfg(feature = "g081")] {
        pub use stm32g0::stm32g081 as pac;
    }
}

// G4 PAC
cfg_if! {
    if #[cfg(feature = "g431")] {
        pub use stm32g4::stm32g431 as pac;
    } else if #[cfg(feature = "g441")] {
        pub use stm32g4::stm32g441 as pac;
    } else if #[cfg(feature = "g473")] {
        pub use stm32g4::stm32g473 as pac;
    } else if #[cfg(feature = "g474")] {
        pub use stm32g4::stm32g474 as pac;
    } else if #[cfg(feature = "g491")] {
        pub use stm32g4::stm32g491 as pac;
    }
}

pub mod error;
pub mod iwdg;
pub mod regs;

mod util;

pub use error::{Error, Result};
