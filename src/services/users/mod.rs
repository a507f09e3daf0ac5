pub mod directory;
pub mod memory;

pub use directory::{DirectoryError, Principal, UserDirectory};
pub use memory::InMemoryUserDirectory;
