pub mod callback;
pub mod storage;
