//! Parsers for uploaded measurement files.
//!
//! - [`tabular`]: Parse tab-delimited text into a [`TabularTable`]
//!
//! # Example
//!
//! ```
//! use edx_ingest::parsing::{parse_tab_delimited, CellValue};
//!
//! let table = parse_tab_delimited(b"MA\tElement\n1\tV\n", "inline").unwrap();
//! assert_eq!(table.columns(), ["MA", "Element"]);
//! assert_eq!(table.row(0).unwrap().get("MA"), Some(&CellValue::Number(1.0)));
//! ```

pub mod tabular;

#[cfg(test)]
mod tabular_tests;

pub use tabular::{parse_tab_delimited, CellValue, Row, TabularReader, TabularTable};
