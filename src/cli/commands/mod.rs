pub mod catalog;
pub mod check;
pub mod prompt;
pub mod token;
