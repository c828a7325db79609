pub mod emit;
pub mod resolve;
