pub mod expenses;
pub mod status;
