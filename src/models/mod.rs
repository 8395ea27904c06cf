pub mod concert;
pub mod reservation;
pub mod seat;
pub mod theater;
pub mod user;

pub use concert::Concert;
pub use reservation::{Reservation, ReservedSeat};
pub use seat::{Seat, SeatStatus};
pub use theater::Theater;
pub use user::User;
