mod billing;
mod car;
mod client;
mod money;
mod rental;
mod timestamp;

pub use billing::*;
pub use car::*;
pub use client::*;
pub use money::*;
pub use rental::*;
pub use timestamp::*;
