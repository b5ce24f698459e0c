//! SMS templates and bulk sends

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::{CreateTemplateCommand, SendSmsCommand};
use crate::domain::aggregates::{SmsRecord, SmsTemplate};
use crate::domain::services::TenantScope;
use crate::domain::value_objects::Actor;
use crate::ports::inbound::{MessagingUseCases, UseCaseError};
use crate::ports::outbound::{SmsGateway, SmsRepository};

pub struct MessagingService {
    sms_repo: Arc<dyn SmsRepository>,
    gateway: Arc<dyn SmsGateway>,
}

impl MessagingService {
    pub fn new(sms_repo: Arc<dyn SmsRepository>, gateway: Arc<dyn SmsGateway>) -> Self {
        Self { sms_repo, gateway }
    }
}

/// Trimmed, de-duplicated recipients in request order
fn normalize_recipients(recipients: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(recipients.len());
    for r in recipients {
        let r = r.trim();
        if !r.is_empty() && !out.iter().any(|seen| seen == r) {
            out.push(r.to_string());
        }
    }
    out
}

#[async_trait]
impl MessagingUseCases for MessagingService {
    async fn create_template(&self, actor: &Actor, command: CreateTemplateCommand) -> Result<SmsTemplate, UseCaseError> {
        let name = command.name.trim();
        if name.is_empty() || command.content.trim().is_empty() {
            return Err(UseCaseError::ValidationFailed("template name and content are required".into()));
        }

        let template = SmsTemplate::new(name.to_string(), command.content, TenantScope::resolve(actor), actor.id());
        self.sms_repo.insert_template(&template).await?;
        Ok(template)
    }

    async fn list_templates(&self, actor: &Actor) -> Result<Vec<SmsTemplate>, UseCaseError> {
        Ok(self.sms_repo.templates(&TenantScope::resolve(actor)).await?)
    }

    async fn send_bulk(&self, actor: &Actor, command: SendSmsCommand) -> Result<SmsRecord, UseCaseError> {
        if command.content.trim().is_empty() {
            return Err(UseCaseError::ValidationFailed("message content is required".into()));
        }
        let recipients = normalize_recipients(command.recipients);
        if recipients.is_empty() {
            return Err(UseCaseError::ValidationFailed("at least one recipient is required".into()));
        }

        if let Err(e) = self.gateway.send(&recipients, &command.content).await {
            tracing::warn!(error = %e, recipients = recipients.len(), "sms delivery failed, recording send anyway");
        }

        let record = SmsRecord::new(recipients, command.content, TenantScope::resolve(actor), actor.id());
        self.sms_repo.insert_record(&record).await?;
        Ok(record)
    }

    async fn sms_history(&self, actor: &Actor) -> Result<Vec<SmsRecord>, UseCaseError> {
        Ok(self.sms_repo.history(&TenantScope::resolve(actor)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::fixtures::*;
    use crate::infrastructure::persistence::InMemorySmsRepository;
    use crate::infrastructure::TracingSmsGateway;
    use crate::ports::outbound::GatewayError;

    struct DownGateway;

    #[async_trait]
    impl SmsGateway for DownGateway {
        async fn send(&self, _recipients: &[String], _content: &str) -> Result<(), GatewayError> {
            Err(GatewayError("provider timeout".into()))
        }
    }

    fn send(recipients: &[&str], content: &str) -> SendSmsCommand {
        SendSmsCommand {
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
            content: content.into(),
        }
    }

    #[test]
    fn test_normalize_recipients() {
        let got = normalize_recipients(vec![" 9000 ".into(), "".into(), "9001".into(), "9000".into()]);
        assert_eq!(got, vec!["9000", "9001"]);
    }

    #[tokio::test]
    async fn test_send_is_recorded_per_tenant() {
        let service = MessagingService::new(Arc::new(InMemorySmsRepository::new()), Arc::new(TracingSmsGateway));
        let a = admin();
        let sub = subadmin_of(&a);

        let record = service.send_bulk(&sub, send(&["9000", "9001"], "Fees due")).await.unwrap();
        assert_eq!(record.sent_to.len(), 2);
        assert_eq!(record.created_by, sub.id());

        assert_eq!(service.sms_history(&a).await.unwrap().len(), 1);
        assert!(service.sms_history(&admin()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_still_records() {
        let service = MessagingService::new(Arc::new(InMemorySmsRepository::new()), Arc::new(DownGateway));
        let a = admin();

        service.send_bulk(&a, send(&["9000"], "Hall closed today")).await.unwrap();
        assert_eq!(service.sms_history(&a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_send_rejected() {
        let service = MessagingService::new(Arc::new(InMemorySmsRepository::new()), Arc::new(TracingSmsGateway));
        let a = admin();

        assert!(matches!(service.send_bulk(&a, send(&[" "], "hi")).await, Err(UseCaseError::ValidationFailed(_))));
        assert!(matches!(service.send_bulk(&a, send(&["9000"], "  ")).await, Err(UseCaseError::ValidationFailed(_))));
        assert!(service.sms_history(&a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_templates() {
        let service = MessagingService::new(Arc::new(InMemorySmsRepository::new()), Arc::new(TracingSmsGateway));
        let a = admin();

        let t = service
            .create_template(&a, CreateTemplateCommand { name: " Reminder ".into(), content: "Renew soon".into() })
            .await
            .unwrap();
        assert_eq!(t.name, "Reminder");
        assert_eq!(service.list_templates(&subadmin_of(&a)).await.unwrap().len(), 1);

        let blank = CreateTemplateCommand { name: "x".into(), content: "".into() };
        assert!(matches!(service.create_template(&a, blank).await, Err(UseCaseError::ValidationFailed(_))));
    }
}
