//! SMS templates and send history

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::{SmsRecordId, SmsTemplateId, TenantId, UserId};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SmsTemplate {
    pub id: SmsTemplateId,
    pub name: String,
    pub content: String,
    pub created_by: UserId,
    pub root_admin: TenantId,
    pub created_at: DateTime<Utc>,
}

impl SmsTemplate {
    pub fn new(name: String, content: String, tenant: TenantId, created_by: UserId) -> Self {
        Self {
            id: SmsTemplateId::new(),
            name,
            content,
            created_by,
            root_admin: tenant,
            created_at: Utc::now(),
        }
    }
}

/// A bulk send as it was requested; delivery outcome is not tracked
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SmsRecord {
    pub id: SmsRecordId,
    pub sent_to: Vec<String>,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub created_by: UserId,
    pub root_admin: TenantId,
}

impl SmsRecord {
    pub fn new(sent_to: Vec<String>, content: String, tenant: TenantId, created_by: UserId) -> Self {
        Self {
            id: SmsRecordId::new(),
            sent_to,
            content,
            sent_at: Utc::now(),
            created_by,
            root_admin: tenant,
        }
    }
}
