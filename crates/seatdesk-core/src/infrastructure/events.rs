//! Event publisher adapters

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::DomainEvent;
use crate::ports::outbound::{EventPublisher, RepositoryError};

/// Writes every event to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        for event in events {
            tracing::info!(
                event_type = event.event_type(),
                aggregate_id = %event.aggregate_id(),
                "domain event"
            );
            tracing::debug!(?event);
        }
        Ok(())
    }
}

/// Keeps published events in memory
#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|e| e.event_type()).collect()
    }

    pub fn take(&self) -> Vec<DomainEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        self.events.lock().extend(events);
        Ok(())
    }
}
