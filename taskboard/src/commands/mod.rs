pub mod check;
pub mod create_user;
pub mod hash;
pub mod run;
