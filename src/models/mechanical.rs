//! Mechanical systems models.
//!
//! This module contains multibody models such as carts carrying pendulum chains.

pub mod cart_pendulum;
