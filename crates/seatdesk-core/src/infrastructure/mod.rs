//! Infrastructure adapters

pub mod persistence;
pub mod clock;
pub mod sequence;
pub mod events;
pub mod sms;

pub use clock::{FixedClock, SystemClock};
pub use sequence::InMemoryMemberIdSequence;
pub use events::{RecordingEventPublisher, TracingEventPublisher};
pub use sms::TracingSmsGateway;
