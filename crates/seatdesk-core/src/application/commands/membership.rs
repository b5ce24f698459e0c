//! Membership Lifecycle service

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::*;
use crate::domain::aggregates::{Member, MemberError, MemberProfilePatch, MembershipStatus};
use crate::domain::services::TenantScope;
use crate::domain::value_objects::{Actor, MemberId, MemberKey, TenantId};
use crate::ports::inbound::{EnrollmentUseCases, MembershipUseCases, UseCaseError};
use crate::ports::outbound::{
    Clock, EventPublisher, MemberFilter, MemberIdSequence, MemberRepository, RepositoryError,
};

use super::publish;

/// Search results are capped at this many members
pub const SEARCH_LIMIT: usize = 20;

pub struct MembershipService {
    member_repo: Arc<dyn MemberRepository>,
    sequence: Arc<dyn MemberIdSequence>,
    enrollment: Arc<dyn EnrollmentUseCases>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl MembershipService {
    pub fn new(
        member_repo: Arc<dyn MemberRepository>,
        sequence: Arc<dyn MemberIdSequence>,
        enrollment: Arc<dyn EnrollmentUseCases>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            member_repo,
            sequence,
            enrollment,
            event_publisher,
            clock,
        }
    }

    async fn load(&self, tenant: &TenantId, key: &MemberKey) -> Result<Member, UseCaseError> {
        self.member_repo
            .find_by_key(tenant, key)
            .await?
            .ok_or_else(|| UseCaseError::not_found("member", key))
    }

    /// Save the member and publish what it raised
    async fn commit(&self, member: &mut Member) -> Result<(), UseCaseError> {
        self.member_repo.save(member).await?;
        publish(self.event_publisher.as_ref(), member.take_events()).await;
        Ok(())
    }

    async fn change_status(
        &self,
        actor: &Actor,
        key: &MemberKey,
        change: fn(&mut Member) -> Result<(), MemberError>,
    ) -> Result<Member, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let mut member = self.load(&tenant, key).await?;
        change(&mut member)?;
        self.commit(&mut member).await?;

        tracing::info!(member = %member.member_id(), status = ?member.status(), by = %actor.id(), "member status changed");
        Ok(member)
    }

    /// Explicit code, or the next number of the tenant's counter
    async fn resolve_member_id(&self, tenant: &TenantId, explicit: Option<&str>) -> Result<(MemberId, bool), UseCaseError> {
        match explicit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(code) => Ok((MemberId::parse(code)?, true)),
            None => {
                let floor = self.member_repo.max_member_number(tenant).await?.unwrap_or(0);
                let number = self.sequence.next(tenant, floor).await?;
                Ok((MemberId::from_number(number)?, false))
            }
        }
    }
}

#[async_trait]
impl MembershipUseCases for MembershipService {
    async fn add_member(&self, actor: &Actor, command: AddMemberCommand) -> Result<MemberAdded, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let profile = command.profile.normalized();
        if profile.name.is_empty() {
            return Err(UseCaseError::ValidationFailed("member name is required".into()));
        }
        if profile.mobile.is_empty() {
            return Err(UseCaseError::ValidationFailed("member mobile is required".into()));
        }

        // Inline enrollment is priced and reconciled before anything is written
        let inline = match (command.plan, command.start_date) {
            (Some(plan), Some(start)) => {
                let quote = self.enrollment.quote(actor, &plan, &command.payment).await?;
                if let Some(quoted) = command.quoted_due {
                    if quoted != quote.due {
                        return Err(UseCaseError::ValidationFailed(format!(
                            "quoted due {quoted} does not match computed due {}",
                            quote.due
                        )));
                    }
                }
                Some((plan, start))
            }
            (Some(_), None) => {
                return Err(UseCaseError::ValidationFailed("start_date is required with a plan".into()))
            }
            (None, Some(_)) => {
                return Err(UseCaseError::ValidationFailed("plan is required with a start_date".into()))
            }
            (None, None) => None,
        };

        let (member_id, explicit) = self.resolve_member_id(&tenant, command.member_id.as_deref()).await?;
        let mut member = Member::register(member_id, profile, tenant, actor.id());

        if let Err(e) = self.member_repo.insert(&member).await {
            tracing::debug!(member = %member.member_id(), error = %e, "member insert rejected");
            return Err(match e {
                RepositoryError::DuplicateKey(_) => UseCaseError::Conflict(format!(
                    "member id {} is already taken, retry",
                    member.member_id()
                )),
                other => other.into(),
            });
        }
        if explicit {
            self.sequence.observe(&tenant, member.member_id().number()).await?;
        }
        publish(self.event_publisher.as_ref(), member.take_events()).await;

        tracing::info!(member = %member.member_id(), tenant = %tenant, by = %actor.id(), "member registered");

        let Some((plan, start_date)) = inline else {
            return Ok(MemberAdded { member, billing: None });
        };

        let enrollment = self
            .enrollment
            .enroll(actor, EnrollCommand {
                member: member.key(),
                plan,
                start_date,
                payment: command.payment,
            })
            .await
            .map_err(|e| {
                tracing::warn!(member = %member.member_id(), error = %e, "member registered but inline enrollment failed");
                UseCaseError::EnrollmentIncomplete {
                    member: member.key(),
                    member_id: member.member_id().clone(),
                    reason: match e {
                        UseCaseError::Repository(_) => "storage error".to_string(),
                        other => other.to_string(),
                    },
                }
            })?;

        Ok(MemberAdded {
            member: enrollment.member,
            billing: Some(enrollment.billing),
        })
    }

    async fn get_member(&self, actor: &Actor, key: &MemberKey) -> Result<Member, UseCaseError> {
        self.load(&TenantScope::resolve(actor), key).await
    }

    async fn list_members(&self, actor: &Actor, category: MemberCategory) -> Result<Vec<Member>, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let filter = category.to_filter(self.clock.today());
        Ok(self.member_repo.find_by_tenant(&tenant, &filter).await?)
    }

    async fn search_members(&self, actor: &Actor, query: &str) -> Result<Vec<Member>, UseCaseError> {
        if query.trim().is_empty() {
            return Ok(vec![]);
        }
        let tenant = TenantScope::resolve(actor);
        Ok(self.member_repo.search(&tenant, query, SEARCH_LIMIT).await?)
    }

    async fn update_member(
        &self,
        actor: &Actor,
        key: &MemberKey,
        patch: MemberProfilePatch,
    ) -> Result<Member, UseCaseError> {
        if patch.name.as_deref().map(|n| n.trim().is_empty()).unwrap_or(false) {
            return Err(UseCaseError::ValidationFailed("member name cannot be empty".into()));
        }
        if patch.mobile.as_deref().map(|m| m.trim().is_empty()).unwrap_or(false) {
            return Err(UseCaseError::ValidationFailed("member mobile cannot be empty".into()));
        }

        let tenant = TenantScope::resolve(actor);
        let mut member = self.load(&tenant, key).await?;
        member.update_profile(patch);
        self.commit(&mut member).await?;
        Ok(member)
    }

    async fn block_member(&self, actor: &Actor, key: &MemberKey) -> Result<Member, UseCaseError> {
        self.change_status(actor, key, Member::block).await
    }

    async fn unblock_member(&self, actor: &Actor, key: &MemberKey) -> Result<Member, UseCaseError> {
        self.change_status(actor, key, Member::unblock).await
    }

    async fn mark_left(&self, actor: &Actor, key: &MemberKey) -> Result<Member, UseCaseError> {
        self.change_status(actor, key, Member::mark_left).await
    }

    async fn freeze_member(
        &self,
        actor: &Actor,
        key: &MemberKey,
        command: FreezeCommand,
    ) -> Result<Member, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let today = self.clock.today();
        let mut member = self.load(&tenant, key).await?;

        let start = command.start_date;
        member.freeze(start, today, command.reason, actor.id())?;
        self.commit(&mut member).await?;

        tracing::info!(member = %member.member_id(), %start, by = %actor.id(), "member frozen");
        Ok(member)
    }

    async fn unfreeze_member(&self, actor: &Actor, key: &MemberKey) -> Result<UnfreezeResult, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let today = self.clock.today();
        let mut member = self.load(&tenant, key).await?;

        let outcome = member.unfreeze(today, actor.id())?;
        self.commit(&mut member).await?;

        tracing::info!(
            member = %member.member_id(),
            frozen_days = outcome.frozen_days,
            new_expiry = ?outcome.new_expiry,
            by = %actor.id(),
            "member unfrozen"
        );

        Ok(UnfreezeResult {
            message: outcome.message(),
            frozen_days: outcome.frozen_days,
            extension_applied: outcome.extension_applied(),
            new_expiry: outcome.new_expiry,
            member,
        })
    }

    async fn mark_expired(&self, actor: &Actor) -> Result<usize, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let today = self.clock.today();
        let filter = MemberFilter {
            membership_status: Some(MembershipStatus::Active),
            ..Default::default()
        };

        let mut expired = 0;
        for mut member in self.member_repo.find_by_tenant(&tenant, &filter).await? {
            if member.expire_if_lapsed(today) {
                self.commit(&mut member).await?;
                expired += 1;
            }
        }

        tracing::info!(tenant = %tenant, expired, "expired lapsed memberships");
        Ok(expired)
    }

    async fn next_member_id(&self, actor: &Actor) -> Result<MemberId, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let floor = self.member_repo.max_member_number(&tenant).await?.unwrap_or(0);
        let number = self.sequence.peek(&tenant, floor).await?;
        Ok(MemberId::from_number(number)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::fixtures::*;
    use crate::application::commands::EnrollmentService;
    use crate::domain::aggregates::{MemberStatus, NewPlan, Plan};
    use crate::domain::value_objects::{DiscountType, PlanId};
    use crate::infrastructure::persistence::{
        InMemoryBillingRepository, InMemoryMemberRepository, InMemoryPlanRepository,
    };
    use crate::infrastructure::{FixedClock, InMemoryMemberIdSequence, RecordingEventPublisher};
    use crate::ports::outbound::{BillingRepository, PlanRepository};
    use rust_decimal_macros::dec;

    struct Harness {
        service: MembershipService,
        plans: Arc<InMemoryPlanRepository>,
        clock: Arc<FixedClock>,
        events: Arc<RecordingEventPublisher>,
    }

    fn harness() -> Harness {
        harness_with(Arc::new(InMemoryBillingRepository::new()))
    }

    fn harness_with(billings: Arc<dyn BillingRepository>) -> Harness {
        let members = Arc::new(InMemoryMemberRepository::new());
        let plans = Arc::new(InMemoryPlanRepository::new());
        let events = Arc::new(RecordingEventPublisher::new());
        let clock = fixed_clock();
        let enrollment = Arc::new(EnrollmentService::new(
            members.clone(),
            plans.clone(),
            billings,
            events.clone(),
            clock.clone(),
        ));
        let service = MembershipService::new(
            members,
            Arc::new(InMemoryMemberIdSequence::new()),
            enrollment,
            events.clone(),
            clock.clone(),
        );
        Harness { service, plans, clock, events }
    }

    fn add(name: &str) -> AddMemberCommand {
        AddMemberCommand {
            member_id: None,
            profile: profile(name),
            plan: None,
            start_date: None,
            payment: PaymentInput::default(),
            quoted_due: None,
        }
    }

    async fn seed_plan(h: &Harness, actor: &Actor) -> PlanId {
        let plan = Plan::create(
            NewPlan {
                name: "Quarterly".into(),
                plan_type: "full_day".into(),
                duration_months: 3,
                amount: dec!(1000),
                enrollment_fee: dec!(200),
            },
            TenantScope::resolve(actor),
            actor.id(),
        )
        .unwrap();
        h.plans.save(&plan).await.unwrap();
        plan.id
    }

    /// Registered and enrolled member, expiring 2026-06-10
    async fn enrolled(h: &Harness, actor: &Actor) -> Member {
        let plan = seed_plan(h, actor).await;
        let mut cmd = add("Meera");
        cmd.plan = Some(plan);
        cmd.start_date = Some(today());
        h.service.add_member(actor, cmd).await.unwrap().member
    }

    #[tokio::test]
    async fn test_ids_are_allocated_per_tenant() {
        let h = harness();
        let a = admin();
        let b = admin();

        let first = h.service.add_member(&a, add("One")).await.unwrap().member;
        let second = h.service.add_member(&a, add("Two")).await.unwrap().member;
        let other = h.service.add_member(&b, add("Other")).await.unwrap().member;

        assert_eq!(first.member_id().as_str(), "MEM-0001");
        assert_eq!(second.member_id().as_str(), "MEM-0002");
        assert_eq!(other.member_id().as_str(), "MEM-0001");
        assert_eq!(first.membership_status(), MembershipStatus::Pending);
        assert_eq!(h.service.next_member_id(&a).await.unwrap().as_str(), "MEM-0003");
    }

    #[tokio::test]
    async fn test_explicit_id_moves_sequence_and_duplicates_conflict() {
        let h = harness();
        let a = admin();

        let mut cmd = add("Manual");
        cmd.member_id = Some("MEM-0010".into());
        h.service.add_member(&a, cmd.clone()).await.unwrap();

        let err = h.service.add_member(&a, cmd).await.unwrap_err();
        assert!(matches!(err, UseCaseError::Conflict(_)));

        let next = h.service.add_member(&a, add("Auto")).await.unwrap().member;
        assert_eq!(next.member_id().as_str(), "MEM-0011");

        let mut bad = add("Bad");
        bad.member_id = Some("MEM-12".into());
        assert!(matches!(h.service.add_member(&a, bad).await, Err(UseCaseError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_tenant_isolation_with_same_codes() {
        let h = harness();
        let a = admin();
        let b = admin();
        let mine = h.service.add_member(&a, add("Mine")).await.unwrap().member;
        let theirs = h.service.add_member(&b, add("Theirs")).await.unwrap().member;
        assert_eq!(mine.member_id(), theirs.member_id());

        assert!(matches!(h.service.get_member(&b, &mine.key()).await, Err(UseCaseError::NotFound(_))));
        assert!(matches!(h.service.block_member(&b, &mine.key()).await, Err(UseCaseError::NotFound(_))));

        let listed = h.service.list_members(&a, MemberCategory::Total).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key(), mine.key());

        let sub = subadmin_of(&a);
        assert_eq!(h.service.get_member(&sub, &mine.key()).await.unwrap().key(), mine.key());
    }

    #[tokio::test]
    async fn test_inline_enrollment_with_matching_quote() {
        let h = harness();
        let a = admin();
        let plan = seed_plan(&h, &a).await;

        let mut cmd = add("Inline");
        cmd.plan = Some(plan);
        cmd.start_date = Some(today());
        cmd.payment = PaymentInput {
            paid_amount: dec!(500),
            discount_type: Some(DiscountType::Percentage),
            discount_value: dec!(10),
            tax_applicable: true,
            tax_amount: dec!(50),
            ..Default::default()
        };
        cmd.quoted_due = Some(dec!(630));

        let added = h.service.add_member(&a, cmd).await.unwrap();
        let billing = added.billing.unwrap();
        assert_eq!(billing.due_amount, dec!(630));
        assert_eq!(added.member.membership_status(), MembershipStatus::Active);
        assert_eq!(added.member.plan_expiry_date(), Some(day(2026, 6, 10)));
    }

    #[tokio::test]
    async fn test_quoted_due_mismatch_writes_nothing() {
        let h = harness();
        let a = admin();
        let plan = seed_plan(&h, &a).await;

        let mut cmd = add("Mismatch");
        cmd.plan = Some(plan);
        cmd.start_date = Some(today());
        cmd.quoted_due = Some(dec!(999));

        let err = h.service.add_member(&a, cmd).await.unwrap_err();
        assert!(matches!(err, UseCaseError::ValidationFailed(_)));
        assert!(h.service.list_members(&a, MemberCategory::Total).await.unwrap().is_empty());
        assert!(h.events.event_types().is_empty());
    }

    #[tokio::test]
    async fn test_failed_inline_enrollment_names_the_stored_member() {
        let h = harness_with(Arc::new(FailingBillingRepository));
        let a = admin();
        let plan = seed_plan(&h, &a).await;

        let mut cmd = add("Asha");
        cmd.plan = Some(plan);
        cmd.start_date = Some(today());

        let err = h.service.add_member(&a, cmd).await.unwrap_err();
        let UseCaseError::EnrollmentIncomplete { member, member_id, reason } = err else {
            panic!("expected EnrollmentIncomplete, got {err:?}");
        };
        assert_eq!(member_id.to_string(), "MEM-0001");
        assert_eq!(reason, "storage error");

        let stored = h.service.get_member(&a, &member).await.unwrap();
        assert_eq!(stored.member_id(), &member_id);
        assert!(stored.current_plan().is_none());
        assert_eq!(h.service.list_members(&a, MemberCategory::Total).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_freeze_then_unfreeze_after_five_days() {
        let h = harness();
        let a = admin();
        let sub = subadmin_of(&a);
        let member = enrolled(&h, &a).await;

        let frozen = h
            .service
            .freeze_member(&a, &member.key(), FreezeCommand { start_date: today(), reason: Some("travel".into()) })
            .await
            .unwrap();
        assert_eq!(frozen.status(), MemberStatus::Freeze);
        assert!(frozen.freeze_history().open_episode().is_some());

        h.clock.advance(5);
        let result = h.service.unfreeze_member(&sub, &member.key()).await.unwrap();

        assert_eq!(result.frozen_days, 5);
        assert!(result.extension_applied);
        assert_eq!(result.new_expiry, Some(day(2026, 6, 15)));
        assert_eq!(result.member.status(), MemberStatus::Active);
        let episode = &result.member.freeze_history().episodes()[0];
        assert_eq!(episode.days, Some(5));
        assert_eq!(episode.unfrozen_by, Some(sub.id()));

        let stored = h.service.get_member(&a, &member.key()).await.unwrap();
        assert_eq!(stored.plan_expiry_date(), Some(day(2026, 6, 15)));
    }

    #[tokio::test]
    async fn test_same_day_unfreeze_reports_no_extension() {
        let h = harness();
        let a = admin();
        let member = enrolled(&h, &a).await;

        h.service.freeze_member(&a, &member.key(), FreezeCommand::starting(today())).await.unwrap();
        let result = h.service.unfreeze_member(&a, &member.key()).await.unwrap();

        assert_eq!(result.frozen_days, 0);
        assert!(!result.extension_applied);
        assert!(result.message.contains("no extension"));
        assert_eq!(result.member.plan_expiry_date(), Some(day(2026, 6, 10)));
    }

    #[tokio::test]
    async fn test_freeze_twice_conflicts_without_mutation() {
        let h = harness();
        let a = admin();
        let member = enrolled(&h, &a).await;
        h.service.freeze_member(&a, &member.key(), FreezeCommand::starting(today())).await.unwrap();
        let before = h.service.get_member(&a, &member.key()).await.unwrap();

        h.clock.advance(1);
        let err = h
            .service
            .freeze_member(&a, &member.key(), FreezeCommand::starting(day(2026, 3, 11)))
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::Conflict(_)));

        let after = h.service.get_member(&a, &member.key()).await.unwrap();
        assert_eq!(after.freeze_history(), before.freeze_history());
        assert_eq!(after.freeze_start_date(), before.freeze_start_date());
    }

    #[tokio::test]
    async fn test_unfreeze_of_active_member_is_illegal() {
        let h = harness();
        let a = admin();
        let member = enrolled(&h, &a).await;

        let err = h.service.unfreeze_member(&a, &member.key()).await.unwrap_err();
        assert!(matches!(err, UseCaseError::IllegalState(_)));
        let stored = h.service.get_member(&a, &member.key()).await.unwrap();
        assert_eq!(stored.status(), MemberStatus::Active);
        assert_eq!(stored.plan_expiry_date(), member.plan_expiry_date());
    }

    #[tokio::test]
    async fn test_freeze_rules() {
        let h = harness();
        let a = admin();

        let pending = h.service.add_member(&a, add("No Plan")).await.unwrap().member;
        let err = h.service.freeze_member(&a, &pending.key(), FreezeCommand::starting(today())).await.unwrap_err();
        assert!(matches!(err, UseCaseError::IllegalState(_)));

        let member = enrolled(&h, &a).await;
        let past = FreezeCommand::starting(day(2026, 3, 9));
        let err = h.service.freeze_member(&a, &member.key(), past).await.unwrap_err();
        assert!(matches!(err, UseCaseError::ValidationFailed(_)));

        h.service.freeze_member(&a, &member.key(), FreezeCommand::starting(today())).await.unwrap();
        let err = h.service.block_member(&a, &member.key()).await.unwrap_err();
        assert!(matches!(err, UseCaseError::IllegalState(_)));
    }

    #[tokio::test]
    async fn test_status_categories() {
        let h = harness();
        let a = admin();
        let blocked = h.service.add_member(&a, add("Blocked")).await.unwrap().member;
        let left = h.service.add_member(&a, add("Left")).await.unwrap().member;
        h.service.add_member(&a, add("Active")).await.unwrap();

        h.service.block_member(&a, &blocked.key()).await.unwrap();
        h.service.mark_left(&a, &left.key()).await.unwrap();

        assert_eq!(h.service.list_members(&a, MemberCategory::Blocked).await.unwrap().len(), 1);
        assert_eq!(h.service.list_members(&a, MemberCategory::Left).await.unwrap().len(), 1);
        assert_eq!(h.service.list_members(&a, MemberCategory::Active).await.unwrap().len(), 1);

        let unblocked = h.service.unblock_member(&a, &blocked.key()).await.unwrap();
        assert_eq!(unblocked.status(), MemberStatus::Active);
    }

    #[tokio::test]
    async fn test_expiring_and_mark_expired() {
        let h = harness();
        let a = admin();
        let member = enrolled(&h, &a).await;

        h.clock.set(day(2026, 6, 8));
        let soon = h
            .service
            .list_members(&a, MemberCategory::Expiring { min_days: 1, max_days: 3 })
            .await
            .unwrap();
        assert_eq!(soon.len(), 1);

        h.clock.set(day(2026, 6, 10));
        assert_eq!(h.service.mark_expired(&a).await.unwrap(), 0);

        h.clock.set(day(2026, 6, 11));
        assert_eq!(h.service.mark_expired(&a).await.unwrap(), 1);
        assert_eq!(h.service.mark_expired(&a).await.unwrap(), 0);

        let stored = h.service.get_member(&a, &member.key()).await.unwrap();
        assert_eq!(stored.membership_status(), MembershipStatus::Expired);
        assert_eq!(h.service.list_members(&a, MemberCategory::Expired).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_and_update() {
        let h = harness();
        let a = admin();
        let member = h.service.add_member(&a, add("Farah Khan")).await.unwrap().member;

        assert_eq!(h.service.search_members(&a, "FARAH").await.unwrap().len(), 1);
        assert!(h.service.search_members(&a, " ").await.unwrap().is_empty());
        assert!(h.service.search_members(&admin(), "farah").await.unwrap().is_empty());

        let patch = MemberProfilePatch { institute: Some("City College".into()), ..Default::default() };
        let updated = h.service.update_member(&a, &member.key(), patch).await.unwrap();
        assert_eq!(updated.profile().institute.as_deref(), Some("City College"));
        assert_eq!(updated.member_id(), member.member_id());

        let blank = MemberProfilePatch { name: Some(" ".into()), ..Default::default() };
        assert!(matches!(
            h.service.update_member(&a, &member.key(), blank).await,
            Err(UseCaseError::ValidationFailed(_))
        ));
    }
}
