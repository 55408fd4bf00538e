//! This is an internal module that contains utility functionality used by other modules.

/// Upper bound on status-register polls made by the bounded (`try_`) register helpers.
pub(crate) const MAX_ITERS: u32 = 300_000;

/// Spins while `$cond` holds, returning `Err($err)` from the enclosing function once
/// `MAX_ITERS` polls have elapsed. An optional block runs on every iteration.
///
/// Example: `bounded_loop!(regs.status() & SR_PVU != 0, Error::RegisterUnchanged);`
macro_rules! bounded_loop {
    ($cond:expr, $err:expr) => {
        bounded_loop!($cond, $err, {})
    };
    ($cond:expr, $err:expr, $body:block) => {{
        let mut i: u32 = 0;
        while $cond {
            $body
            i += 1;
            if i >= $crate::util::MAX_ITERS {
                return Err($err);
            }
        }
    }};
}

pub(crate) use bounded_loop;
