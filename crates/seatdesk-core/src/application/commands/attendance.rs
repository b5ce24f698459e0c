//! Attendance register

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::application::dto::MarkAttendanceCommand;
use crate::domain::aggregates::Attendance;
use crate::domain::services::TenantScope;
use crate::domain::value_objects::{Actor, MemberKey, TenantId};
use crate::ports::inbound::{AttendanceUseCases, UseCaseError};
use crate::ports::outbound::{AttendanceRepository, MemberRepository, RepositoryError};

pub struct AttendanceService {
    attendance_repo: Arc<dyn AttendanceRepository>,
    member_repo: Arc<dyn MemberRepository>,
}

impl AttendanceService {
    pub fn new(attendance_repo: Arc<dyn AttendanceRepository>, member_repo: Arc<dyn MemberRepository>) -> Self {
        Self {
            attendance_repo,
            member_repo,
        }
    }

    async fn ensure_member(&self, tenant: &TenantId, member: &MemberKey) -> Result<(), UseCaseError> {
        match self.member_repo.find_by_key(tenant, member).await? {
            Some(_) => Ok(()),
            None => Err(UseCaseError::not_found("member", member)),
        }
    }
}

#[async_trait]
impl AttendanceUseCases for AttendanceService {
    async fn mark_attendance(&self, actor: &Actor, command: MarkAttendanceCommand) -> Result<Attendance, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        self.ensure_member(&tenant, &command.member).await?;

        let record = Attendance::mark(command.member, command.date, command.present, tenant, actor.id());
        match self.attendance_repo.insert(&record).await {
            Ok(()) => Ok(record),
            Err(RepositoryError::DuplicateKey(_)) => Err(UseCaseError::Conflict(format!(
                "attendance for member {} on {} is already marked",
                command.member, command.date
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn attendance_history(
        &self,
        actor: &Actor,
        member: &MemberKey,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>, UseCaseError> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(UseCaseError::ValidationFailed(format!("range start {f} is after end {t}")));
            }
        }
        let tenant = TenantScope::resolve(actor);
        self.ensure_member(&tenant, member).await?;
        Ok(self.attendance_repo.find_by_member(&tenant, member, from, to).await?)
    }
}
