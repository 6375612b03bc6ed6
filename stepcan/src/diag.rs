// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line-oriented diagnostics.
//!
//! Any `core::fmt::Write` works as a sink (`hw::Usart` on the board, a `String` in tests). Lines are
//! terminated with CRLF so they render correctly on a serial terminal. Write errors are dropped:
//! the diagnostic sink is never allowed to stall the control loop.

macro_rules! diag {
    ($log:expr, $($arg:tt)*) => {{
        use core::fmt::Write as _;
        let _ = $log.write_fmt(format_args!($($arg)*));
        let _ = $log.write_str("\r\n");
    }};
}
