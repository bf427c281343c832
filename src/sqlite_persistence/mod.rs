mod table_def;

pub use table_def::{Column, Index, SqlType, Table};
