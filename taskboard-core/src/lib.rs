pub mod authz;
pub mod db;
mod services;
pub use services::*;
mod throttle;
pub use throttle::*;
mod tasks;
pub use tasks::*;
