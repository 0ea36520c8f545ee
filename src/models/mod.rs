pub mod booking;
pub mod user;

pub use booking::Booking;
pub use user::User;
