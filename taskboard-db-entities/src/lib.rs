#![allow(non_snake_case)]

pub mod Group;
pub mod LoginAttempt;
pub mod Task;
pub mod ThrottleState;
pub mod User;
