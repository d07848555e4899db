//! Public entry points for the invoking process.

pub mod handler;
