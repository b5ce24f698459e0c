//! Enrollment Orchestrator
//!
//! Prices a plan, writes the billing, then moves the member onto the new
//! plan window. The two writes are not transactional: when the member write
//! fails the caller gets [`UseCaseError::PartialFailure`] with the billing id
//! and nothing is retried, since a retry would bill twice.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::*;
use crate::domain::aggregates::{Billing, BillingDraft, Member, PaymentSnapshot, Plan, PlanError};
use crate::domain::services::{PricingCalculator, Quote, TenantScope};
use crate::domain::value_objects::{Actor, BillingId, MemberKey, PlanId, TenantId};
use crate::ports::inbound::{EnrollmentUseCases, UseCaseError};
use crate::ports::outbound::{
    BillingFilter, BillingRepository, Clock, EventPublisher, MemberRepository, PlanRepository,
};

use super::publish;

pub struct EnrollmentService {
    member_repo: Arc<dyn MemberRepository>,
    plan_repo: Arc<dyn PlanRepository>,
    billing_repo: Arc<dyn BillingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl EnrollmentService {
    pub fn new(
        member_repo: Arc<dyn MemberRepository>,
        plan_repo: Arc<dyn PlanRepository>,
        billing_repo: Arc<dyn BillingRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            member_repo,
            plan_repo,
            billing_repo,
            event_publisher,
            clock,
        }
    }

    async fn load_member(&self, tenant: &TenantId, key: &MemberKey) -> Result<Member, UseCaseError> {
        self.member_repo
            .find_by_key(tenant, key)
            .await?
            .ok_or_else(|| UseCaseError::not_found("member", key))
    }

    /// Plan of the tenant that can still be sold
    async fn sellable_plan(&self, tenant: &TenantId, id: &PlanId) -> Result<Plan, UseCaseError> {
        let plan = self
            .plan_repo
            .find_by_id(tenant, id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("plan", id))?;

        if !plan.enabled {
            return Err(PlanError::Disabled.into());
        }
        Ok(plan)
    }
}

#[async_trait]
impl EnrollmentUseCases for EnrollmentService {
    async fn quote(&self, actor: &Actor, plan: &PlanId, payment: &PaymentInput) -> Result<Quote, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let plan = self.sellable_plan(&tenant, plan).await?;
        Ok(PricingCalculator::price(&plan, &payment.discount(), &payment.tax(), payment.paid_amount)?)
    }

    async fn enroll(&self, actor: &Actor, command: EnrollCommand) -> Result<Enrollment, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let today = self.clock.today();

        // Everything that can be rejected is checked before the first write
        let mut member = self.load_member(&tenant, &command.member).await?;
        member.ensure_enrollable()?;
        let plan = self.sellable_plan(&tenant, &command.plan).await?;
        let payment = command.payment;
        let quote = PricingCalculator::price(&plan, &payment.discount(), &payment.tax(), payment.paid_amount)?;
        let end_date = plan.end_date_from(command.start_date)?;

        let (billing, billing_event) = Billing::issue(
            BillingDraft {
                member: member.key(),
                plan: plan.id,
                start_date: command.start_date,
                end_date,
                payment_method: payment.payment_method,
                paid: payment.paid_amount,
                discount: payment.discount(),
                tax: payment.tax(),
                bill_date: payment.bill_date.unwrap_or(today),
                remarks: payment.billing_remarks,
                created_by: actor.id(),
                root_admin: tenant,
            },
            &quote,
        );
        self.billing_repo.insert(&billing).await?;

        let snapshot = PaymentSnapshot {
            plan_amount: plan.amount,
            enrollment_fee: plan.enrollment_fee,
            paid: payment.paid_amount,
            due: quote.due,
        };
        if let Err(e) = self.write_member(&mut member, &plan, &billing, snapshot).await {
            tracing::warn!(
                billing_id = %billing.id,
                member = %member.member_id(),
                error = %e,
                "billing recorded but member update failed"
            );
            return Err(UseCaseError::PartialFailure {
                billing_id: billing.id,
                reason: e.to_string(),
            });
        }

        tracing::info!(
            member = %member.member_id(),
            plan = %plan.name,
            start = %billing.start_date,
            expiry = %billing.end_date,
            due = %billing.due_amount,
            "member enrolled"
        );

        let mut events = vec![billing_event];
        events.extend(member.take_events());
        publish(self.event_publisher.as_ref(), events).await;

        Ok(Enrollment { billing, member })
    }

    async fn get_billing(&self, actor: &Actor, id: &BillingId) -> Result<Billing, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        self.billing_repo
            .find_by_id(&tenant, id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("billing", id))
    }

    async fn list_billings(&self, actor: &Actor, filter: BillingFilter) -> Result<Vec<Billing>, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        Ok(self.billing_repo.find_by_tenant(&tenant, &filter).await?)
    }

    async fn member_billings(&self, actor: &Actor, member: &MemberKey) -> Result<Vec<Billing>, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let member = self.load_member(&tenant, member).await?;
        let filter = BillingFilter { member: Some(member.key()), plan: None };
        Ok(self.billing_repo.find_by_tenant(&tenant, &filter).await?)
    }
}

impl EnrollmentService {
    async fn write_member(
        &self,
        member: &mut Member,
        plan: &Plan,
        billing: &Billing,
        snapshot: PaymentSnapshot,
    ) -> Result<(), UseCaseError> {
        member.apply_enrollment(plan.id, billing.start_date, billing.end_date, snapshot)?;
        self.member_repo.save(member).await?;
        Ok(())
    }
}
