pub mod check;
pub mod extract;
pub mod info;
pub mod pack;

pub use check::*;
pub use extract::*;
pub use info::*;
pub use pack::*;
