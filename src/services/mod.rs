// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod covers;

pub use covers::{CoverStore, CoverUpload};
