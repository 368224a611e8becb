//! Storage formats: the native .grd text format, CSV and .xlsx.

pub mod csv;
pub mod parser;
pub mod writer;
pub mod xlsx;

pub use csv::{parse_csv, parse_csv_content, write_csv, write_csv_content};
pub use parser::{parse_grd, parse_grd_content};
pub use writer::{write_grd, write_grd_content};
pub use xlsx::{read_xlsx, write_xlsx};
