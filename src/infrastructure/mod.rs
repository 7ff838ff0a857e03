pub mod providers;
pub mod utils;
