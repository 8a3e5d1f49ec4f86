pub mod mirror;
pub mod storage;
pub mod transform;
