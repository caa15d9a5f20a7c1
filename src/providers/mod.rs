pub mod file;
pub mod memory;

pub use file::FileRateProvider;
pub use memory::MemoryRateProvider;
