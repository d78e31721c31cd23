pub mod account;
pub mod category;
pub mod question;
pub mod quiz;
pub mod result;
pub mod session;
