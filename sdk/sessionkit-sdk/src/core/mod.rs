pub mod connection;
pub mod constants;
pub mod paymaster;
