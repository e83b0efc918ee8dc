//! halodream - generate, serve and simulate a landing page of canvas effects.
//!
//! The effects themselves live in `halodream-viz`; this crate loads the site
//! configuration, renders the page around them and runs the particle field
//! headlessly.

pub mod config;
pub mod page;
pub mod simulate;
