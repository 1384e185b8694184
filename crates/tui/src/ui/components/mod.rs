pub mod card;
pub mod charts;
pub mod hints;
pub mod pie;
