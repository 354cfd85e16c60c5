pub mod print;

pub use print::{PrintElement, PrintModel, PrintRow, RowItem};
