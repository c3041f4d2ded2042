pub mod bank;
pub mod charity;
