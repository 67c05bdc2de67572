pub mod account;
pub mod guard;
pub mod paymaster;
pub mod policy;
pub mod sessions;
