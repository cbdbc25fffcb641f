pub mod memory;
pub mod traits;

pub use memory::MemoryUserDirectory;
pub use traits::{NewUser, UserDirectory};
