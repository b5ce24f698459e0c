//! Member Aggregate
//!
//! Aggregate root for a member of a space: profile, plan window, last payment
//! snapshot, seat view and the freeze state machine.
//!
//! ```text
//!   active ──block──► blocked ──unblock──► active
//!     │                  │
//!     ├──left──► left    │
//!     │                  │
//!     └──freeze──► freeze ◄──freeze── (blocked | left)
//!                    │
//!                    └──unfreeze──► active   (expiry += frozen days)
//! ```

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::events::{DomainEvent, MemberEvent};
use crate::domain::value_objects::{MemberId, MemberKey, PlanId, SeatId, TenantId, UserId};

/// Longest accepted freeze reason, in characters
pub const MAX_FREEZE_REASON_LEN: usize = 200;

/// Member aggregate root
#[derive(Clone, Debug, Serialize)]
pub struct Member {
    key: MemberKey,
    member_id: MemberId,
    root_admin: TenantId,
    created_by: UserId,
    #[serde(flatten)]
    profile: MemberProfile,
    status: MemberStatus,
    membership_status: MembershipStatus,
    current_plan: Option<PlanId>,
    plan_start_date: Option<NaiveDate>,
    plan_expiry_date: Option<NaiveDate>,
    last_payment: Option<PaymentSnapshot>,
    seat: Option<SeatId>,
    freeze_start_date: Option<NaiveDate>,
    freeze_history: FreezeHistory,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

impl Member {
    /// Register a new member (factory method)
    pub fn register(
        member_id: MemberId,
        profile: MemberProfile,
        tenant: TenantId,
        created_by: UserId,
    ) -> Self {
        let now = Utc::now();
        let key = MemberKey::new();

        let mut member = Self {
            key,
            member_id: member_id.clone(),
            root_admin: tenant,
            created_by,
            profile,
            status: MemberStatus::Active,
            membership_status: MembershipStatus::Pending,
            current_plan: None,
            plan_start_date: None,
            plan_expiry_date: None,
            last_payment: None,
            seat: None,
            freeze_start_date: None,
            freeze_history: FreezeHistory::default(),
            created_at: now,
            updated_at: now,
            events: vec![],
        };

        member.raise_event(DomainEvent::Member(MemberEvent::Registered {
            member: key,
            member_id,
            tenant,
            created_by,
        }));

        member
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn key(&self) -> MemberKey { self.key }
    pub fn member_id(&self) -> &MemberId { &self.member_id }
    pub fn root_admin(&self) -> TenantId { self.root_admin }
    pub fn created_by(&self) -> UserId { self.created_by }
    pub fn profile(&self) -> &MemberProfile { &self.profile }
    pub fn status(&self) -> MemberStatus { self.status }
    pub fn membership_status(&self) -> MembershipStatus { self.membership_status }
    pub fn current_plan(&self) -> Option<PlanId> { self.current_plan }
    pub fn plan_start_date(&self) -> Option<NaiveDate> { self.plan_start_date }
    pub fn plan_expiry_date(&self) -> Option<NaiveDate> { self.plan_expiry_date }
    pub fn last_payment(&self) -> Option<&PaymentSnapshot> { self.last_payment.as_ref() }
    pub fn seat(&self) -> Option<SeatId> { self.seat }
    pub fn freeze_start_date(&self) -> Option<NaiveDate> { self.freeze_start_date }
    pub fn freeze_history(&self) -> &FreezeHistory { &self.freeze_history }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    pub fn is_frozen(&self) -> bool {
        self.status == MemberStatus::Freeze
    }

    // =========================================================================
    // Business Operations
    // =========================================================================

    /// A frozen member has to be unfrozen before a new plan window starts
    pub fn ensure_enrollable(&self) -> Result<(), MemberError> {
        if self.is_frozen() {
            return Err(MemberError::FrozenMemberLocked);
        }
        Ok(())
    }

    /// Apply a freshly priced plan window and payment snapshot
    pub fn apply_enrollment(
        &mut self,
        plan: PlanId,
        start: NaiveDate,
        expiry: NaiveDate,
        snapshot: PaymentSnapshot,
    ) -> Result<(), MemberError> {
        self.ensure_enrollable()?;

        self.status = MemberStatus::Active;
        self.membership_status = MembershipStatus::Active;
        self.current_plan = Some(plan);
        self.plan_start_date = Some(start);
        self.plan_expiry_date = Some(expiry);
        self.last_payment = Some(snapshot);
        self.touch();

        self.raise_event(DomainEvent::Member(MemberEvent::Enrolled {
            member: self.key,
            plan,
            start,
            expiry,
        }));
        Ok(())
    }

    /// Start an open-ended freeze on `start`
    pub fn freeze(
        &mut self,
        start: NaiveDate,
        today: NaiveDate,
        reason: Option<String>,
        applied_by: UserId,
    ) -> Result<(), MemberError> {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if let Some(r) = &reason {
            let len = r.chars().count();
            if len > MAX_FREEZE_REASON_LEN {
                return Err(MemberError::ReasonTooLong(len));
            }
        }

        if start < today {
            return Err(MemberError::FreezeStartInPast { start, today });
        }

        if self.is_frozen() || self.freeze_history.open_episode().is_some() {
            return Err(MemberError::AlreadyFrozen);
        }

        if self.plan_expiry_date.is_none() {
            return Err(MemberError::NoActivePlan);
        }

        self.freeze_start_date = Some(start);
        self.status = MemberStatus::Freeze;
        self.freeze_history.open(FreezeEpisode {
            start_date: start,
            end_date: None,
            days: None,
            applied_by,
            unfrozen_by: None,
            reason,
            created_at: Utc::now(),
        });
        self.touch();

        self.raise_event(DomainEvent::Member(MemberEvent::Frozen {
            member: self.key,
            start,
            applied_by,
        }));

        Ok(())
    }

    /// Lift the freeze and credit the frozen calendar days back to the expiry
    pub fn unfreeze(&mut self, today: NaiveDate, unfrozen_by: UserId) -> Result<UnfreezeOutcome, MemberError> {
        if !self.is_frozen() {
            return Err(MemberError::NotFrozen);
        }
        let freeze_start = self.freeze_start_date.ok_or(MemberError::MissingFreezeStart)?;

        let frozen_days = frozen_days_between(freeze_start, today);
        let previous_expiry = self.plan_expiry_date;
        let mut new_expiry = None;

        if frozen_days > 0 {
            if let Some(expiry) = previous_expiry {
                let extended = expiry
                    .checked_add_days(Days::new(u64::from(frozen_days)))
                    .ok_or(MemberError::DateOverflow)?;
                if extended > expiry {
                    self.plan_expiry_date = Some(extended);
                    new_expiry = Some(extended);
                }
            }
        }

        self.freeze_history.close_last(today, frozen_days, unfrozen_by);
        self.freeze_start_date = None;
        self.status = MemberStatus::Active;
        self.touch();

        self.raise_event(DomainEvent::Member(MemberEvent::Unfrozen {
            member: self.key,
            frozen_days,
            new_expiry,
            unfrozen_by,
        }));

        Ok(UnfreezeOutcome {
            frozen_days,
            previous_expiry,
            new_expiry,
        })
    }

    pub fn block(&mut self) -> Result<(), MemberError> {
        self.change_status(MemberStatus::Blocked)
    }

    pub fn unblock(&mut self) -> Result<(), MemberError> {
        self.change_status(MemberStatus::Active)
    }

    pub fn mark_left(&mut self) -> Result<(), MemberError> {
        self.change_status(MemberStatus::Left)
    }

    /// Flip an active membership whose plan lapsed before `today` to expired
    pub fn expire_if_lapsed(&mut self, today: NaiveDate) -> bool {
        let lapsed = self.membership_status == MembershipStatus::Active
            && self.plan_expiry_date.map(|e| e < today).unwrap_or(false);
        if !lapsed {
            return false;
        }

        self.membership_status = MembershipStatus::Expired;
        self.touch();
        self.raise_event(DomainEvent::Member(MemberEvent::MembershipExpired {
            member: self.key,
            expired_on: today,
        }));
        true
    }

    /// Replace the supplied profile fields
    pub fn update_profile(&mut self, patch: MemberProfilePatch) {
        let p = &mut self.profile;
        if let Some(name) = patch.name { p.name = name; }
        if let Some(mobile) = patch.mobile { p.mobile = mobile; }
        if patch.email.is_some() { p.email = patch.email; }
        if patch.address.is_some() { p.address = patch.address; }
        if patch.gender.is_some() { p.gender = patch.gender; }
        if patch.dob.is_some() { p.dob = patch.dob; }
        if patch.father_name.is_some() { p.father_name = patch.father_name; }
        if patch.unique_id.is_some() { p.unique_id = patch.unique_id; }
        if patch.institute.is_some() { p.institute = patch.institute; }
        if patch.course.is_some() { p.course = patch.course; }
        if patch.home_phone.is_some() { p.home_phone = patch.home_phone; }
        if let Some(documents) = patch.documents { p.documents = documents; }
        if patch.batch_start.is_some() { p.batch_start = patch.batch_start; }
        if patch.batch_end.is_some() { p.batch_end = patch.batch_end; }
        if patch.remarks.is_some() { p.remarks = patch.remarks; }
        self.touch();
    }

    /// Denormalized seat view; the seat record owns the assignment
    pub fn set_seat(&mut self, seat: Option<SeatId>) {
        self.seat = seat;
        self.touch();
    }

    // =========================================================================
    // Domain Events
    // =========================================================================

    /// Get and clear accumulated domain events
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn change_status(&mut self, to: MemberStatus) -> Result<(), MemberError> {
        if self.is_frozen() {
            return Err(MemberError::FrozenMemberLocked);
        }

        let from = self.status;
        self.status = to;
        self.touch();

        if from != to {
            self.raise_event(DomainEvent::Member(MemberEvent::StatusChanged {
                member: self.key,
                from,
                to,
            }));
        }
        Ok(())
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Calendar days between the freeze start and the unfreeze day, never negative
pub fn frozen_days_between(freeze_start: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - freeze_start).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

// =============================================================================
// Supporting Types
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Blocked,
    Left,
    Freeze,
}

impl Default for MemberStatus {
    fn default() -> Self { Self::Active }
}

/// Plan-expiry tracking, orthogonal to [`MemberStatus`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    Expired,
    Pending,
    Cancelled,
}

impl Default for MembershipStatus {
    fn default() -> Self { Self::Pending }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Contact and enrollment details of a member
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub father_name: Option<String>,
    pub unique_id: Option<String>,
    pub institute: Option<String>,
    pub course: Option<String>,
    pub home_phone: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    pub batch_start: Option<String>,
    pub batch_end: Option<String>,
    pub remarks: Option<String>,
}

impl MemberProfile {
    /// Trim free text and lowercase the email
    pub fn normalized(mut self) -> Self {
        fn clean(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        self.name = self.name.trim().to_string();
        self.mobile = self.mobile.trim().to_string();
        self.email = clean(self.email).map(|e| e.to_lowercase());
        self.address = clean(self.address);
        self.father_name = clean(self.father_name);
        self.unique_id = clean(self.unique_id);
        self.institute = clean(self.institute);
        self.course = clean(self.course);
        self.home_phone = clean(self.home_phone);
        self.remarks = clean(self.remarks);
        self
    }
}

/// Partial profile update; `None` leaves the field untouched
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemberProfilePatch {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub father_name: Option<String>,
    pub unique_id: Option<String>,
    pub institute: Option<String>,
    pub course: Option<String>,
    pub home_phone: Option<String>,
    pub documents: Option<Vec<String>>,
    pub batch_start: Option<String>,
    pub batch_end: Option<String>,
    pub remarks: Option<String>,
}

/// Figures of the most recent billing, copied onto the member
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSnapshot {
    pub plan_amount: Decimal,
    pub enrollment_fee: Decimal,
    pub paid: Decimal,
    pub due: Decimal,
}

/// One interval during which the plan clock was paused
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeEpisode {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub days: Option<u32>,
    pub applied_by: UserId,
    pub unfrozen_by: Option<UserId>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FreezeEpisode {
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Ordered freeze episodes; only the last one may be open
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FreezeHistory(Vec<FreezeEpisode>);

impl FreezeHistory {
    pub fn episodes(&self) -> &[FreezeEpisode] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The currently open episode, if any
    pub fn open_episode(&self) -> Option<&FreezeEpisode> {
        self.0.last().filter(|e| e.is_open())
    }

    fn open(&mut self, episode: FreezeEpisode) {
        self.0.push(episode);
    }

    fn close_last(&mut self, end: NaiveDate, days: u32, unfrozen_by: UserId) {
        match self.0.last_mut() {
            Some(last) => {
                if !last.is_open() {
                    tracing::warn!(
                        start = %last.start_date,
                        "closing a freeze episode that was already closed"
                    );
                }
                last.end_date = Some(end);
                last.days = Some(days);
                last.unfrozen_by = Some(unfrozen_by);
            }
            None => tracing::warn!("unfreeze without any recorded freeze episode"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemberError {
    #[error("member is already frozen, unfreeze first")]
    AlreadyFrozen,
    #[error("member has no active plan to freeze")]
    NoActivePlan,
    #[error("freeze start date {start} cannot be before {today}")]
    FreezeStartInPast { start: NaiveDate, today: NaiveDate },
    #[error("freeze reason is {0} characters, at most 200 allowed")]
    ReasonTooLong(usize),
    #[error("member is not frozen")]
    NotFrozen,
    #[error("invalid freeze state: no freeze start date recorded")]
    MissingFreezeStart,
    #[error("member is frozen, unfreeze first")]
    FrozenMemberLocked,
    #[error("plan expiry date out of range")]
    DateOverflow,
}

/// Result of lifting a freeze
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnfreezeOutcome {
    pub frozen_days: u32,
    pub previous_expiry: Option<NaiveDate>,
    pub new_expiry: Option<NaiveDate>,
}

impl UnfreezeOutcome {
    pub fn extension_applied(&self) -> bool {
        self.new_expiry.is_some()
    }

    /// Human readable summary for API responses
    pub fn message(&self) -> String {
        match (self.frozen_days, self.new_expiry) {
            (0, _) => "Member unfrozen; no extension applied because the freeze \
                       had not started or started today."
                .to_string(),
            (days, Some(expiry)) => format!(
                "Member unfrozen after {days} day{}. Expiry extended to {expiry}.",
                if days == 1 { "" } else { "s" }
            ),
            (days, None) => format!(
                "Member unfrozen after {days} day{}; no extension applied.",
                if days == 1 { "" } else { "s" }
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn enrolled_member() -> Member {
        let mut member = Member::register(
            MemberId::parse("MEM-0001").unwrap(),
            MemberProfile { name: "Asha".into(), mobile: "9000000001".into(), ..Default::default() },
            TenantId::new(),
            UserId::new(),
        );
        member.apply_enrollment(
            PlanId::new(),
            date(2026, 1, 1),
            date(2026, 4, 1),
            PaymentSnapshot {
                plan_amount: Decimal::new(1000, 0),
                enrollment_fee: Decimal::new(200, 0),
                paid: Decimal::new(1200, 0),
                due: Decimal::ZERO,
            },
        )
        .unwrap();
        member.take_events();
        member
    }

    #[test]
    fn test_register_is_pending() {
        let mut member = Member::register(
            MemberId::parse("MEM-0002").unwrap(),
            MemberProfile::default(),
            TenantId::new(),
            UserId::new(),
        );
        assert_eq!(member.status(), MemberStatus::Active);
        assert_eq!(member.membership_status(), MembershipStatus::Pending);
        let events = member.take_events();
        assert!(matches!(events[0], DomainEvent::Member(MemberEvent::Registered { .. })));
    }

    #[test]
    fn test_freeze_opens_episode() {
        let mut member = enrolled_member();
        let admin = UserId::new();
        let today = date(2026, 2, 10);

        member.freeze(today, today, Some("  exams  ".into()), admin).unwrap();

        assert_eq!(member.status(), MemberStatus::Freeze);
        assert_eq!(member.freeze_start_date(), Some(today));
        assert_eq!(member.freeze_history().len(), 1);
        let open = member.freeze_history().open_episode().unwrap();
        assert_eq!(open.applied_by, admin);
        assert_eq!(open.reason.as_deref(), Some("exams"));
        assert!(open.days.is_none());
    }

    #[test]
    fn test_freeze_rejects_past_start() {
        let mut member = enrolled_member();
        let today = date(2026, 2, 10);
        let err = member.freeze(date(2026, 2, 9), today, None, UserId::new()).unwrap_err();
        assert!(matches!(err, MemberError::FreezeStartInPast { .. }));
        assert_eq!(member.status(), MemberStatus::Active);
    }

    #[test]
    fn test_freeze_twice_is_rejected_without_mutation() {
        let mut member = enrolled_member();
        let today = date(2026, 2, 10);
        member.freeze(today, today, None, UserId::new()).unwrap();
        let before = member.clone();

        assert_eq!(member.freeze(today, today, None, UserId::new()), Err(MemberError::AlreadyFrozen));
        assert_eq!(member.freeze_history(), before.freeze_history());
        assert_eq!(member.freeze_start_date(), before.freeze_start_date());
    }

    #[test]
    fn test_freeze_without_plan() {
        let mut member = Member::register(
            MemberId::parse("MEM-0003").unwrap(),
            MemberProfile::default(),
            TenantId::new(),
            UserId::new(),
        );
        let today = date(2026, 2, 10);
        assert_eq!(member.freeze(today, today, None, UserId::new()), Err(MemberError::NoActivePlan));
        assert!(member.freeze_history().is_empty());
    }

    #[test]
    fn test_freeze_reason_limit() {
        let mut member = enrolled_member();
        let today = date(2026, 2, 10);
        let reason = "x".repeat(201);
        assert_eq!(
            member.freeze(today, today, Some(reason), UserId::new()),
            Err(MemberError::ReasonTooLong(201))
        );
        assert!(member.freeze(today, today, Some("y".repeat(200)), UserId::new()).is_ok());
    }

    #[test]
    fn test_same_day_unfreeze_has_no_extension() {
        let mut member = enrolled_member();
        let today = date(2026, 2, 10);
        member.freeze(today, today, None, UserId::new()).unwrap();

        let outcome = member.unfreeze(today, UserId::new()).unwrap();

        assert_eq!(outcome.frozen_days, 0);
        assert!(!outcome.extension_applied());
        assert!(outcome.message().contains("no extension"));
        assert_eq!(member.plan_expiry_date(), Some(date(2026, 4, 1)));
        assert_eq!(member.status(), MemberStatus::Active);
        assert!(member.freeze_start_date().is_none());
        assert_eq!(member.freeze_history().episodes()[0].days, Some(0));
    }

    #[test]
    fn test_unfreeze_before_future_start_is_zero_days() {
        let mut member = enrolled_member();
        let today = date(2026, 2, 10);
        member.freeze(date(2026, 2, 20), today, None, UserId::new()).unwrap();

        let outcome = member.unfreeze(date(2026, 2, 12), UserId::new()).unwrap();
        assert_eq!(outcome.frozen_days, 0);
        assert_eq!(member.plan_expiry_date(), Some(date(2026, 4, 1)));
    }

    #[test]
    fn test_unfreeze_after_five_days_extends_expiry() {
        let mut member = enrolled_member();
        let admin = UserId::new();
        let sub = UserId::new();
        let day0 = date(2026, 2, 10);
        member.freeze(day0, day0, None, admin).unwrap();

        let outcome = member.unfreeze(date(2026, 2, 15), sub).unwrap();

        assert_eq!(outcome.frozen_days, 5);
        assert_eq!(outcome.new_expiry, Some(date(2026, 4, 6)));
        assert_eq!(member.plan_expiry_date(), Some(date(2026, 4, 6)));
        assert!(outcome.message().contains("5 days"));

        let episode = &member.freeze_history().episodes()[0];
        assert_eq!(episode.end_date, Some(date(2026, 2, 15)));
        assert_eq!(episode.days, Some(5));
        assert_eq!(episode.unfrozen_by, Some(sub));
        assert!(member.freeze_history().open_episode().is_none());
    }

    #[test]
    fn test_unfreeze_requires_freeze() {
        let mut member = enrolled_member();
        let before = member.clone();
        assert_eq!(member.unfreeze(date(2026, 2, 10), UserId::new()), Err(MemberError::NotFrozen));
        assert_eq!(member.status(), before.status());
        assert_eq!(member.plan_expiry_date(), before.plan_expiry_date());
    }

    #[test]
    fn test_second_freeze_closes_only_last_episode() {
        let mut member = enrolled_member();
        let d = |day| date(2026, 3, day);
        member.freeze(d(1), d(1), None, UserId::new()).unwrap();
        member.unfreeze(d(3), UserId::new()).unwrap();
        member.freeze(d(10), d(10), None, UserId::new()).unwrap();
        member.unfreeze(d(11), UserId::new()).unwrap();

        let episodes = member.freeze_history().episodes();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].days, Some(2));
        assert_eq!(episodes[1].days, Some(1));
        assert_eq!(member.plan_expiry_date(), Some(date(2026, 4, 4)));
    }

    #[test]
    fn test_status_changes_blocked_while_frozen() {
        let mut member = enrolled_member();
        let today = date(2026, 2, 10);
        member.freeze(today, today, None, UserId::new()).unwrap();

        assert_eq!(member.block(), Err(MemberError::FrozenMemberLocked));
        assert_eq!(member.mark_left(), Err(MemberError::FrozenMemberLocked));
        assert_eq!(member.status(), MemberStatus::Freeze);
    }

    #[test]
    fn test_blocked_member_can_be_frozen() {
        let mut member = enrolled_member();
        member.block().unwrap();
        let today = date(2026, 2, 10);
        member.freeze(today, today, None, UserId::new()).unwrap();
        assert!(member.is_frozen());
    }

    #[test]
    fn test_expire_if_lapsed() {
        let mut member = enrolled_member();
        assert!(!member.expire_if_lapsed(date(2026, 4, 1)));
        assert!(member.expire_if_lapsed(date(2026, 4, 2)));
        assert_eq!(member.membership_status(), MembershipStatus::Expired);
        assert!(!member.expire_if_lapsed(date(2026, 4, 3)));
    }
}
