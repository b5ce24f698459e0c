//! SMS gateway stub

use async_trait::async_trait;

use crate::ports::outbound::{GatewayError, SmsGateway};

/// Logs outgoing messages instead of delivering them
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSmsGateway;

#[async_trait]
impl SmsGateway for TracingSmsGateway {
    async fn send(&self, recipients: &[String], content: &str) -> Result<(), GatewayError> {
        tracing::info!(recipients = recipients.len(), chars = content.chars().count(), "sms dispatched");
        Ok(())
    }
}
