mod address_cache;
mod read_mostly;

pub use address_cache::AddressCache;
pub use read_mostly::ReadMostlyMap;
