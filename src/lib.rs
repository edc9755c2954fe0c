//! Layout engine and data plumbing behind the wedding planning timeline.
//!
//! The [`layout`] module is the core; [`io`] and [`config`] are the outer
//! surfaces the viewer binary uses to feed it.

pub mod config;
pub mod error;
pub mod io;
pub mod layout;
pub mod logging;
pub mod model;
