pub mod clock;
pub mod memory;

pub use clock::{FixedClock, SystemClock};
pub use memory::InMemorySessionAdapter;
