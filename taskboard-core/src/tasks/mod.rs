mod fanout;
mod transition;
pub use fanout::*;
pub use transition::*;
