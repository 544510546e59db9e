// Licensed under the Apache-2.0 license

// Enforce coding guidelines - prevent panic-prone patterns in production code only
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::indexing_slicing))]
#![cfg_attr(not(test), warn(clippy::expect_used))]
#![cfg_attr(not(test), no_std)]

//! Board support for a SAMD-family Arduino-compatible board: the two-wire
//! ("Wire") bus driver layered on a SERCOM peripheral abstraction.

pub mod common;
pub mod i2c;
