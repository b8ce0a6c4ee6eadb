pub mod common;
pub mod debugger;
pub mod storage;
pub mod workload;
