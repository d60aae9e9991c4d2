//! # Cart Pendulum Models
//!
//! Model documents and plant assembly for a cart carrying a chain of
//! serially connected pendulum bars, exposed as a
//! [Twine](https://github.com/isentropic-dev/twine) model.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Utility code starts in a model's internal `core` module and moves to
//! [`support`] once it is useful across models or outside this crate.
//! Only utilities at the crate-level (in [`support`]) are part of the public API.

pub mod models;
pub mod support;
