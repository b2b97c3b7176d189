pub mod process;
pub mod row;
pub mod socket;

pub use process::ProcessGroup;
pub use row::{DisplayRow, SortDirection, NO_PORT};
pub use socket::{
    AddressFamily, EnrichedSocketEntry, ProcessDetails, Protocol, RawSocketRecord, Snapshot,
    SocketAddress,
};
