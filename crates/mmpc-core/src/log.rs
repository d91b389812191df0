/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Stand-ins for the `log` macros when the `log` feature is disabled.
//!
//! Arguments are still type checked through `format_args!` inside a
//! branch that never runs, so values only used in messages do not
//! trigger unused warnings and nothing is formatted at runtime.

// Exported macros land in the crate root, re-exporting them
// here gives callers the `mmpc_core::log::debug` path `log` has.
pub use crate::{
    __mmpc_debug as debug, __mmpc_error as error, __mmpc_info as info, __mmpc_trace as trace,
    __mmpc_warn as warn
};

#[doc(hidden)]
#[macro_export]
macro_rules! __mmpc_discard {
    ($($arg:tt)+) => {
        if false {
            let _ = ::core::format_args!($($arg)+);
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mmpc_error {
    ($($arg:tt)+) => { $crate::__mmpc_discard!($($arg)+) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mmpc_warn {
    ($($arg:tt)+) => { $crate::__mmpc_discard!($($arg)+) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mmpc_info {
    ($($arg:tt)+) => { $crate::__mmpc_discard!($($arg)+) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mmpc_debug {
    ($($arg:tt)+) => { $crate::__mmpc_discard!($($arg)+) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mmpc_trace {
    ($($arg:tt)+) => { $crate::__mmpc_discard!($($arg)+) };
}
