pub mod check;
pub mod expand;
