pub mod body;
pub mod session;
