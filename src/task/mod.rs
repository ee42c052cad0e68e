//! Embassy task implementations for the buggy firmware
pub mod buggy;
pub mod heartbeat;
