pub mod address;
pub mod records;

pub use address::parse_address;
pub use records::{parse_records, SocketRecords};
