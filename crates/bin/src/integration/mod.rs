//! Glue between the CLI and the poprank library.

pub(crate) mod config_locator;
pub(crate) mod workbook_io;
