pub mod account;
pub mod charity;
pub mod transaction;

pub use self::{account::*, charity::*, transaction::*};
