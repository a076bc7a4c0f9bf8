//! serlog
//!
//! Terminal monitor for USB-serial devices. Device output is reassembled into
//! timestamped lines, and the section between `<START_REPORT>` and
//! `<END_REPORT>` can be extracted and exported.
//!
//! Pure Core / Impure Shell: `parser`, `report` and `state` are pure;
//! `source`, `export` and `view` do I/O.

pub mod config;
pub mod export;
pub mod logging;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
pub mod source;
pub mod state;
pub mod view;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
