//! Process exit codes. `ERROR` covers any failure that is not a judge verdict.

pub const SUCCESS: i32 = 0;
pub const ERROR: i32 = 1;
pub const WRONG_ANSWER: i32 = 11;
pub const TIME_LIMIT_EXCEEDED: i32 = 14;
pub const RUNTIME_ERROR: i32 = 15;
pub const COMPILE_ERROR: i32 = 20;
pub const UNHANDLED_VERDICT: i32 = 21;
