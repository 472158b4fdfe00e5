pub mod extract;
pub mod finalize;
