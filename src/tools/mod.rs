//! The tools module holds the parts of the program around the codecs.
//!
//! The tools are:
//! - cli: Command line interface, options, output naming and directory expansion.
//! - report: Timing and size listing for --list.
//!
pub mod cli;
pub mod report;
