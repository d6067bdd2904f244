mod address;
mod state;

pub use self::address::{accounts, Address, AddressError, ADDRESS_LEN};
pub use self::state::{DecodeError, RawState};

/// Monotonically increasing ledger position.
pub type BlockIndex = u64;
