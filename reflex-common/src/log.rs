// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Logging shims.
//!
//! With the `defmt` feature the macros forward to `defmt`; without it the
//! arguments are still evaluated by reference so host builds stay warning free.

macro_rules! log_impl {
    ($level:ident, $($t:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::$level!($($t)*);
        #[cfg(not(feature = "defmt"))]
        log_args!($($t)*);
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! log_args {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $( let _ = &$arg; )*
    }};
}

macro_rules! trace {
    ($($t:tt)*) => { log_impl!(trace, $($t)*) };
}

macro_rules! info {
    ($($t:tt)*) => { log_impl!(info, $($t)*) };
}

macro_rules! warn {
    ($($t:tt)*) => { log_impl!(warn, $($t)*) };
}

macro_rules! error {
    ($($t:tt)*) => { log_impl!(error, $($t)*) };
}
