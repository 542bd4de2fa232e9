mod columns;
mod status;
mod threads;

pub use columns::*;
pub use status::*;
pub use threads::*;
