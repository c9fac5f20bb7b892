//! cutlist: component-list report generator
//!
//! Scans a folder of sheet-metal part images whose filenames encode
//! manufacturing metadata and produces paginated, printable component-list
//! reports per detail serial number.

pub mod cli;
pub mod core;
pub mod parse;
pub mod report;
