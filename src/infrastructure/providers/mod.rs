pub mod clock;
pub mod id_generator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use id_generator::{IdGenerator, UuidV4Generator};
