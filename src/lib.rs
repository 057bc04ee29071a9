//! lockstep - proportional scroll synchronization
//!
//! Scroll any registered container and every other one follows to the same
//! relative position, on both axes, regardless of differing content and
//! viewport sizes.
//!
//! ```ignore
//! use lockstep::{attach, SyncOptions, Viewport, Extent};
//! use std::rc::Rc;
//!
//! let left = Rc::new(Viewport::new(Extent::new(300.0, 2000.0), Extent::new(300.0, 400.0)));
//! let right = Rc::new(Viewport::new(Extent::new(300.0, 1200.0), Extent::new(300.0, 400.0)));
//! let handle = attach(&[Some(left.clone() as _), Some(right.clone() as _)], SyncOptions::default());
//! ```

pub mod config;
pub mod error;
pub mod sync;

pub use sync::*;
