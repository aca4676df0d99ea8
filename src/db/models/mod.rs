pub mod dates;
mod driver_profile;

pub use driver_profile::*;
