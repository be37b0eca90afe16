pub mod config;
pub mod dotenv;
pub mod error;

pub use error::LaunchError;
