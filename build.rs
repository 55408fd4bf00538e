use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        // A PAC is selected; the hardware register impls are available.
        hw: { any(feature = "f4", feature = "l0", feature = "l4", feature = "g0", feature = "g4") },
        // DBGMCU sits behind an RCC clock enable bit on these families.
        dbg_clock_gate: { any(feature = "l0", feature = "g0") },
    }
}
