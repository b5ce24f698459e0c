//! Attendance record

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::value_objects::{AttendanceId, MemberKey, TenantId, UserId};

/// One member's presence on one calendar day
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Attendance {
    pub id: AttendanceId,
    pub member: MemberKey,
    pub date: NaiveDate,
    pub present: bool,
    pub created_by: UserId,
    pub root_admin: TenantId,
    pub created_at: DateTime<Utc>,
}

impl Attendance {
    pub fn mark(member: MemberKey, date: NaiveDate, present: bool, tenant: TenantId, created_by: UserId) -> Self {
        Self {
            id: AttendanceId::new(),
            member,
            date,
            present,
            created_by,
            root_admin: tenant,
            created_at: Utc::now(),
        }
    }
}
