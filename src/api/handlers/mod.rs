pub mod packages;
pub mod payments;
pub mod root;
pub mod sports;
pub mod users;
