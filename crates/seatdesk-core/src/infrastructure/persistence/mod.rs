//! In-memory repository implementations
//!
//! Backed by `parking_lot` locks. Uniqueness checks and conditional updates
//! happen under the write lock, so they hold under concurrent callers.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::domain::aggregates::{
    Attendance, Billing, Floor, Member, Plan, Seat, SmsRecord, SmsTemplate, UserAccount,
};
use crate::domain::value_objects::{
    BillingId, FloorId, MemberId, MemberKey, PlanId, Role, SeatId, TenantId, UserId,
};
use crate::ports::outbound::{
    AccountRepository, AssignOutcome, AttendanceRepository, BillingFilter, BillingRepository,
    FloorRepository, MemberFilter, MemberRepository, PlanRepository, RepositoryError,
    SeatRepository, SmsRepository,
};

// ============================================================================
// Members
// ============================================================================

#[derive(Default)]
pub struct InMemoryMemberRepository {
    members: RwLock<HashMap<MemberKey, Member>>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(items: &mut [T], created: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) {
    items.sort_by(|a, b| created(b).cmp(&created(a)));
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn find_by_key(&self, tenant: &TenantId, key: &MemberKey) -> Result<Option<Member>, RepositoryError> {
        let members = self.members.read();
        Ok(members.get(key).filter(|m| m.root_admin() == *tenant).cloned())
    }

    async fn find_by_member_id(&self, tenant: &TenantId, id: &MemberId) -> Result<Option<Member>, RepositoryError> {
        let members = self.members.read();
        Ok(members
            .values()
            .find(|m| m.root_admin() == *tenant && m.member_id() == id)
            .cloned())
    }

    async fn find_by_tenant(&self, tenant: &TenantId, filter: &MemberFilter) -> Result<Vec<Member>, RepositoryError> {
        let mut found: Vec<Member> = {
            let members = self.members.read();
            members
                .values()
                .filter(|m| m.root_admin() == *tenant && filter.matches(m))
                .cloned()
                .collect()
        };
        newest_first(&mut found, |m| m.created_at());
        Ok(found)
    }

    async fn search(&self, tenant: &TenantId, query: &str, limit: usize) -> Result<Vec<Member>, RepositoryError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(vec![]);
        }

        let mut found: Vec<Member> = {
            let members = self.members.read();
            members
                .values()
                .filter(|m| m.root_admin() == *tenant)
                .filter(|m| {
                    let p = m.profile();
                    p.name.to_lowercase().contains(&query)
                        || p.mobile.to_lowercase().contains(&query)
                        || p.unique_id.as_deref().map(|u| u.to_lowercase().contains(&query)).unwrap_or(false)
                })
                .cloned()
                .collect()
        };
        newest_first(&mut found, |m| m.created_at());
        found.truncate(limit);
        Ok(found)
    }

    async fn max_member_number(&self, tenant: &TenantId) -> Result<Option<u32>, RepositoryError> {
        let members = self.members.read();
        Ok(members
            .values()
            .filter(|m| m.root_admin() == *tenant)
            .map(|m| m.member_id().number())
            .max())
    }

    async fn insert(&self, member: &Member) -> Result<(), RepositoryError> {
        let mut members = self.members.write();
        let taken = members
            .values()
            .any(|m| m.root_admin() == member.root_admin() && m.member_id() == member.member_id());
        if taken || members.contains_key(&member.key()) {
            return Err(RepositoryError::DuplicateKey(member.member_id().to_string()));
        }
        members.insert(member.key(), member.clone());
        Ok(())
    }

    async fn save(&self, member: &Member) -> Result<(), RepositoryError> {
        let mut members = self.members.write();
        match members.get_mut(&member.key()) {
            Some(existing) if existing.root_admin() == member.root_admin() => {
                *existing = member.clone();
                Ok(())
            }
            _ => Err(RepositoryError::NotFound),
        }
    }
}

// ============================================================================
// Plans
// ============================================================================

#[derive(Default)]
pub struct InMemoryPlanRepository {
    plans: RwLock<HashMap<PlanId, Plan>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn find_by_id(&self, tenant: &TenantId, id: &PlanId) -> Result<Option<Plan>, RepositoryError> {
        Ok(self.plans.read().get(id).filter(|p| p.root_admin == *tenant).cloned())
    }

    async fn find_by_tenant(&self, tenant: &TenantId) -> Result<Vec<Plan>, RepositoryError> {
        let mut plans: Vec<Plan> = self
            .plans
            .read()
            .values()
            .filter(|p| p.root_admin == *tenant)
            .cloned()
            .collect();
        newest_first(&mut plans, |p| p.created_at);
        Ok(plans)
    }

    async fn save(&self, plan: &Plan) -> Result<(), RepositoryError> {
        let mut plans = self.plans.write();
        if plans.get(&plan.id).map(|p| p.root_admin != plan.root_admin).unwrap_or(false) {
            return Err(RepositoryError::NotFound);
        }
        plans.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn delete(&self, tenant: &TenantId, id: &PlanId) -> Result<bool, RepositoryError> {
        let mut plans = self.plans.write();
        if plans.get(id).map(|p| p.root_admin == *tenant).unwrap_or(false) {
            plans.remove(id);
            return Ok(true);
        }
        Ok(false)
    }
}

// ============================================================================
// Billings
// ============================================================================

#[derive(Default)]
pub struct InMemoryBillingRepository {
    billings: RwLock<HashMap<BillingId, Billing>>,
}

impl InMemoryBillingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BillingRepository for InMemoryBillingRepository {
    async fn find_by_id(&self, tenant: &TenantId, id: &BillingId) -> Result<Option<Billing>, RepositoryError> {
        Ok(self.billings.read().get(id).filter(|b| b.root_admin == *tenant).cloned())
    }

    async fn find_by_tenant(&self, tenant: &TenantId, filter: &BillingFilter) -> Result<Vec<Billing>, RepositoryError> {
        let mut billings: Vec<Billing> = self
            .billings
            .read()
            .values()
            .filter(|b| b.root_admin == *tenant && filter.matches(b))
            .cloned()
            .collect();
        newest_first(&mut billings, |b| b.created_at);
        Ok(billings)
    }

    async fn insert(&self, billing: &Billing) -> Result<(), RepositoryError> {
        let mut billings = self.billings.write();
        if billings.contains_key(&billing.id) {
            return Err(RepositoryError::DuplicateKey(billing.id.to_string()));
        }
        billings.insert(billing.id, billing.clone());
        Ok(())
    }
}

// ============================================================================
// Floors
// ============================================================================

#[derive(Default)]
pub struct InMemoryFloorRepository {
    floors: RwLock<HashMap<FloorId, Floor>>,
}

impl InMemoryFloorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FloorRepository for InMemoryFloorRepository {
    async fn find_by_id(&self, tenant: &TenantId, id: &FloorId) -> Result<Option<Floor>, RepositoryError> {
        Ok(self.floors.read().get(id).filter(|f| f.root_admin == *tenant).cloned())
    }

    async fn find_by_name(&self, tenant: &TenantId, name: &str) -> Result<Option<Floor>, RepositoryError> {
        Ok(self
            .floors
            .read()
            .values()
            .find(|f| f.root_admin == *tenant && f.same_name(name))
            .cloned())
    }

    async fn find_by_tenant(&self, tenant: &TenantId) -> Result<Vec<Floor>, RepositoryError> {
        let mut floors: Vec<Floor> = self
            .floors
            .read()
            .values()
            .filter(|f| f.root_admin == *tenant)
            .cloned()
            .collect();
        floors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(floors)
    }

    async fn save(&self, floor: &Floor) -> Result<(), RepositoryError> {
        let mut floors = self.floors.write();
        if floors.get(&floor.id).map(|f| f.root_admin != floor.root_admin).unwrap_or(false) {
            return Err(RepositoryError::NotFound);
        }
        let clash = floors
            .values()
            .any(|f| f.id != floor.id && f.root_admin == floor.root_admin && f.same_name(&floor.name));
        if clash {
            return Err(RepositoryError::DuplicateKey(format!("floor `{}`", floor.name)));
        }
        floors.insert(floor.id, floor.clone());
        Ok(())
    }

    async fn delete(&self, tenant: &TenantId, id: &FloorId) -> Result<bool, RepositoryError> {
        let mut floors = self.floors.write();
        if floors.get(id).map(|f| f.root_admin == *tenant).unwrap_or(false) {
            floors.remove(id);
            return Ok(true);
        }
        Ok(false)
    }
}

// ============================================================================
// Seats
// ============================================================================

#[derive(Default)]
pub struct InMemorySeatRepository {
    seats: RwLock<HashMap<SeatId, Seat>>,
}

impl InMemorySeatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeatRepository for InMemorySeatRepository {
    async fn find_by_id(&self, tenant: &TenantId, id: &SeatId) -> Result<Option<Seat>, RepositoryError> {
        Ok(self.seats.read().get(id).filter(|s| s.root_admin == *tenant).cloned())
    }

    async fn find_by_tenant(&self, tenant: &TenantId, floor: Option<&FloorId>) -> Result<Vec<Seat>, RepositoryError> {
        let mut seats: Vec<Seat> = self
            .seats
            .read()
            .values()
            .filter(|s| s.root_admin == *tenant && floor.map_or(true, |f| s.floor == *f))
            .cloned()
            .collect();
        seats.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(seats)
    }

    async fn count_by_floor(&self, tenant: &TenantId, floor: &FloorId) -> Result<usize, RepositoryError> {
        Ok(self
            .seats
            .read()
            .values()
            .filter(|s| s.root_admin == *tenant && s.floor == *floor)
            .count())
    }

    async fn insert(&self, seat: &Seat) -> Result<(), RepositoryError> {
        let mut seats = self.seats.write();
        let taken = seats
            .values()
            .any(|s| s.root_admin == seat.root_admin && s.floor == seat.floor && s.number == seat.number);
        if taken {
            return Err(RepositoryError::DuplicateKey(format!("seat {}", seat.number)));
        }
        seats.insert(seat.id, seat.clone());
        Ok(())
    }

    async fn delete(&self, tenant: &TenantId, id: &SeatId) -> Result<Option<Seat>, RepositoryError> {
        let mut seats = self.seats.write();
        if seats.get(id).map(|s| s.root_admin == *tenant).unwrap_or(false) {
            return Ok(seats.remove(id));
        }
        Ok(None)
    }

    async fn assign_if_vacant(
        &self,
        tenant: &TenantId,
        id: &SeatId,
        member: &MemberKey,
    ) -> Result<AssignOutcome, RepositoryError> {
        let mut seats = self.seats.write();
        let Some(seat) = seats.get_mut(id).filter(|s| s.root_admin == *tenant) else {
            return Ok(AssignOutcome::NotFound);
        };

        match seat.assigned_to {
            Some(current) => Ok(AssignOutcome::AlreadyAssigned(current)),
            None => {
                seat.assign(*member)
                    .map_err(|e| RepositoryError::QueryError(e.to_string()))?;
                Ok(AssignOutcome::Assigned(seat.clone()))
            }
        }
    }

    async fn release(
        &self,
        tenant: &TenantId,
        id: &SeatId,
        expected: Option<&MemberKey>,
    ) -> Result<Option<Seat>, RepositoryError> {
        let mut seats = self.seats.write();
        let Some(seat) = seats.get_mut(id).filter(|s| s.root_admin == *tenant) else {
            return Ok(None);
        };

        if let Some(expected) = expected {
            if seat.assigned_to.as_ref() != Some(expected) {
                return Ok(None);
            }
        }
        seat.release();
        Ok(Some(seat.clone()))
    }
}

// ============================================================================
// Attendance
// ============================================================================

#[derive(Default)]
pub struct InMemoryAttendanceRepository {
    records: RwLock<Vec<Attendance>>,
}

impl InMemoryAttendanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryAttendanceRepository {
    async fn insert(&self, record: &Attendance) -> Result<(), RepositoryError> {
        let mut records = self.records.write();
        let duplicate = records
            .iter()
            .any(|r| r.root_admin == record.root_admin && r.member == record.member && r.date == record.date);
        if duplicate {
            return Err(RepositoryError::DuplicateKey(format!("attendance on {}", record.date)));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn find_by_member(
        &self,
        tenant: &TenantId,
        member: &MemberKey,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>, RepositoryError> {
        let mut found: Vec<Attendance> = self
            .records
            .read()
            .iter()
            .filter(|r| r.root_admin == *tenant && r.member == *member)
            .filter(|r| from.map_or(true, |f| r.date >= f) && to.map_or(true, |t| r.date <= t))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.date);
        Ok(found)
    }
}

// ============================================================================
// SMS
// ============================================================================

#[derive(Default)]
pub struct InMemorySmsRepository {
    templates: RwLock<Vec<SmsTemplate>>,
    history: RwLock<Vec<SmsRecord>>,
}

impl InMemorySmsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SmsRepository for InMemorySmsRepository {
    async fn insert_template(&self, template: &SmsTemplate) -> Result<(), RepositoryError> {
        self.templates.write().push(template.clone());
        Ok(())
    }

    async fn templates(&self, tenant: &TenantId) -> Result<Vec<SmsTemplate>, RepositoryError> {
        Ok(self
            .templates
            .read()
            .iter()
            .filter(|t| t.root_admin == *tenant)
            .cloned()
            .collect())
    }

    async fn insert_record(&self, record: &SmsRecord) -> Result<(), RepositoryError> {
        self.history.write().push(record.clone());
        Ok(())
    }

    async fn history(&self, tenant: &TenantId) -> Result<Vec<SmsRecord>, RepositoryError> {
        let mut records: Vec<SmsRecord> = self
            .history
            .read()
            .iter()
            .filter(|r| r.root_admin == *tenant)
            .cloned()
            .collect();
        newest_first(&mut records, |r| r.sent_at);
        Ok(records)
    }
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<UserId, UserAccount>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(self.accounts.read().get(id).cloned())
    }

    async fn insert(&self, account: &UserAccount) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.write();
        if accounts.values().any(|a| a.username == account.username) {
            return Err(RepositoryError::DuplicateKey(format!("username `{}`", account.username)));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn subadmins_of(&self, parent: &UserId) -> Result<Vec<UserAccount>, RepositoryError> {
        let mut subs: Vec<UserAccount> = self
            .accounts
            .read()
            .values()
            .filter(|a| matches!(a.role, Role::Subadmin { parent: p } if p == *parent))
            .cloned()
            .collect();
        subs.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(subs)
    }
}
