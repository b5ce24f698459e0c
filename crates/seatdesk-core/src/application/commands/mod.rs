//! Command handlers
//!
//! Application services that orchestrate use cases.

mod membership;
mod enrollment;
mod catalog;
mod seating;
mod attendance;
mod messaging;
mod accounts;

#[cfg(test)]
pub(crate) mod fixtures;

pub use membership::MembershipService;
pub use enrollment::EnrollmentService;
pub use catalog::PlanService;
pub use seating::SeatingService;
pub use attendance::AttendanceService;
pub use messaging::MessagingService;
pub use accounts::AccountService;

use crate::domain::DomainEvent;
use crate::ports::outbound::EventPublisher;

/// Publish events after a successful write
///
/// The write already happened, so a publisher failure is logged and dropped.
pub(crate) async fn publish(publisher: &dyn EventPublisher, events: Vec<DomainEvent>) {
    if events.is_empty() {
        return;
    }
    let count = events.len();
    if let Err(e) = publisher.publish(events).await {
        tracing::warn!(error = %e, count, "failed to publish domain events");
    }
}
