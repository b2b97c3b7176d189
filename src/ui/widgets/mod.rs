pub mod conn_table;
pub mod summary;
