//! Workbook model and `.xlsx` reading.
//!
//! A [`Workbook`] is an ordered list of [`Sheet`]s, each a rectangular grid of untyped
//! [`crate::types::Value`] cells anchored at A1. Layout-specific code addresses cells through
//! [`CellRef`] so that positional assumptions stay in one place.

mod cell;
pub mod excel;
mod sheet;

pub use cell::CellRef;
pub use excel::read_workbook;
pub use sheet::{Sheet, Workbook};
