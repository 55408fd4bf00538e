//! This minimal example configures the independent watchdog, starts it, and feeds it from the
//! main loop. Comment out the `feed()` call to watch the MCU reset after about one second.
//! The watchdog is frozen while the core is halted, so stepping through this in a debugger
//! won't trigger a reset.

#![deny(warnings)]
#![no_std]
#![no_main]

use cortex_m::asm;
use cortex_m_rt::entry; // The runtime

use hal::{
    iwdg::{DebugMode, Iwdg, IwdgConfig},
    pac,
    regs::McuDebug,
};

// Import the panic handler
use panic_probe as _;

// The L0 LSI is nominally 37kHz, but varies between about 26 and 56kHz. Size the timeout
// for the fast end.
const LSI_HZ: u32 = 56_000;

// This marks the entrypoint of our application.

#[entry]
fn main() -> ! {
    rtt_target::rtt_init_defmt!();
    // Set up microcontroller peripherals
    let dp = pac::Peripherals::take().unwrap();

    let mut dbg = McuDebug::new(dp.DBGMCU);

    let cfg = IwdgConfig {
        debug_mode: DebugMode::Halt,
        ..IwdgConfig::from_timeout_us(1_000_000, LSI_HZ).unwrap()
    };
    defmt::println!("IWDG config: {}", cfg);

    let mut wdg = Iwdg::new(dp.IWDG, cfg, &mut dbg);
    wdg.start();

    loop {
        // Roughly a few hundred ms at the L0's default 2.1Mhz MSI.
        asm::delay(500_000);
        wdg.feed();
        defmt::debug!("Fed the watchdog.");
    }
}

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}
