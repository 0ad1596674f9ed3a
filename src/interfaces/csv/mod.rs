pub mod reader;
pub mod seed;
pub mod writer;
