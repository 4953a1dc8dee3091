pub mod attendance;
pub mod common;
pub mod dashboard;
pub mod package;
pub mod user;

pub use attendance::*;
pub use common::*;
pub use dashboard::*;
pub use package::*;
pub use user::*;
