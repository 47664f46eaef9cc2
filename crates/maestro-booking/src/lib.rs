//! Booking workflow and the interactive session built on top of it.
//! Both are generic over the core service traits so tests can swap in fakes.

pub mod session;
pub mod workflow;

#[cfg(test)]
mod fakes;

pub use session::{search_listings, BookingSession, SearchError, SessionEnd};
pub use workflow::{BookingForm, BookingStage, BookingWorkflow};
