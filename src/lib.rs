pub mod frontend {
    pub mod balance;
    pub mod scanner;
}

pub mod backend {
    pub mod build;
    pub mod emitter;
}

pub mod driver;
pub mod test_helpers;

pub use driver::{translate, Config, Driver, DriverError};
