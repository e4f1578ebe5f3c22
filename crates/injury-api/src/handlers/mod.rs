//! API handlers
//!
//! Author: hephaex@gmail.com

pub mod analysis;
pub mod health;
