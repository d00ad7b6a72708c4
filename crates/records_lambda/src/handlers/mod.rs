pub mod archive;
pub mod operations;
pub mod response;
