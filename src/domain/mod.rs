pub mod user;
pub mod package;
pub mod sports;
pub mod payment;

pub use user::*;
pub use package::*;
pub use sports::*;
pub use payment::*;
