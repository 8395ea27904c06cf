pub mod discount;
pub mod locks;
pub mod reservations;
