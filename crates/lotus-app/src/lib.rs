//! Headless lotus pond: runs the day/night transition core against the sky
//! binding on simulated clocks, pressing the switch on a script.

pub mod driver;
pub mod error;
pub mod frame_clock;
pub mod platform;
pub mod script;
pub mod session;
pub mod stars;

pub use error::AppError;
pub use session::{Session, SessionSummary};
