pub mod calldata;
