//! Floors and seats
//!
//! The seat record owns the assignment; `Member::seat` mirrors it and is
//! written in the same call. A failed mirror write releases the seat again.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::*;
use crate::domain::aggregates::seat::{seat_number, MAX_BULK_SEATS};
use crate::domain::aggregates::{Floor, FloorPatch, Member, Seat, SeatError};
use crate::domain::events::{DomainEvent, SeatEvent};
use crate::domain::services::TenantScope;
use crate::domain::value_objects::{Actor, FloorId, MemberId, MemberKey, SeatId, TenantId};
use crate::ports::inbound::{SeatingUseCases, UseCaseError};
use crate::ports::outbound::{
    AssignOutcome, EventPublisher, FloorRepository, MemberRepository, RepositoryError, SeatRepository,
};

use super::publish;

pub struct SeatingService {
    floor_repo: Arc<dyn FloorRepository>,
    seat_repo: Arc<dyn SeatRepository>,
    member_repo: Arc<dyn MemberRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SeatingService {
    pub fn new(
        floor_repo: Arc<dyn FloorRepository>,
        seat_repo: Arc<dyn SeatRepository>,
        member_repo: Arc<dyn MemberRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            floor_repo,
            seat_repo,
            member_repo,
            event_publisher,
        }
    }

    async fn load_floor(&self, tenant: &TenantId, id: &FloorId) -> Result<Floor, UseCaseError> {
        self.floor_repo
            .find_by_id(tenant, id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("floor", id))
    }

    async fn load_seat(&self, tenant: &TenantId, id: &SeatId) -> Result<Seat, UseCaseError> {
        self.seat_repo
            .find_by_id(tenant, id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("seat", id))
    }

    async fn with_count(&self, tenant: &TenantId, floor: Floor) -> Result<FloorWithSeats, UseCaseError> {
        let seat_count = self.seat_repo.count_by_floor(tenant, &floor.id).await?;
        Ok(FloorWithSeats { floor, seat_count })
    }

    async fn ensure_name_free(&self, tenant: &TenantId, name: &str, except: Option<FloorId>) -> Result<(), UseCaseError> {
        if let Some(existing) = self.floor_repo.find_by_name(tenant, name).await? {
            if Some(existing.id) != except {
                return Err(UseCaseError::Conflict(format!("floor `{}` already exists", existing.name)));
            }
        }
        Ok(())
    }

    /// Clear the member's seat mirror if it still points at `seat`
    async fn clear_member_seat(&self, tenant: &TenantId, holder: &MemberKey, seat: &SeatId) -> Result<(), UseCaseError> {
        if let Some(mut member) = self.member_repo.find_by_key(tenant, holder).await? {
            if member.seat() == Some(*seat) {
                member.set_seat(None);
                self.member_repo.save(&member).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SeatingUseCases for SeatingService {
    async fn create_floor(&self, actor: &Actor, command: CreateFloorCommand) -> Result<Floor, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let floor = Floor::new(&command.name, command.description, command.capacity, tenant, actor.id())?;
        self.ensure_name_free(&tenant, &floor.name, None).await?;
        self.floor_repo.save(&floor).await?;

        tracing::info!(floor = %floor.id, name = %floor.name, "floor created");
        Ok(floor)
    }

    async fn list_floors(&self, actor: &Actor) -> Result<Vec<FloorWithSeats>, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let floors = self.floor_repo.find_by_tenant(&tenant).await?;

        let mut out = Vec::with_capacity(floors.len());
        for floor in floors {
            out.push(self.with_count(&tenant, floor).await?);
        }
        Ok(out)
    }

    async fn get_floor(&self, actor: &Actor, id: &FloorId) -> Result<FloorWithSeats, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let floor = self.load_floor(&tenant, id).await?;
        self.with_count(&tenant, floor).await
    }

    async fn update_floor(&self, actor: &Actor, id: &FloorId, patch: FloorPatch) -> Result<Floor, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let mut floor = self.load_floor(&tenant, id).await?;
        if let Some(name) = patch.name.as_deref() {
            self.ensure_name_free(&tenant, name, Some(floor.id)).await?;
        }
        floor.apply(patch)?;
        self.floor_repo.save(&floor).await?;
        Ok(floor)
    }

    async fn delete_floor(&self, actor: &Actor, id: &FloorId) -> Result<(), UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let floor = self.load_floor(&tenant, id).await?;

        let seats = self.seat_repo.count_by_floor(&tenant, &floor.id).await?;
        if seats > 0 {
            return Err(UseCaseError::Conflict(format!(
                "floor `{}` still has {seats} seat(s), delete them first",
                floor.name
            )));
        }

        self.floor_repo.delete(&tenant, &floor.id).await?;
        tracing::info!(floor = %floor.id, "floor deleted");
        Ok(())
    }

    async fn create_seats(&self, actor: &Actor, command: BulkSeatsCommand) -> Result<BulkSeatsReport, UseCaseError> {
        if command.count == 0 || command.count > MAX_BULK_SEATS {
            return Err(SeatError::InvalidCount(command.count).into());
        }
        let tenant = TenantScope::resolve(actor);
        let floor = self.load_floor(&tenant, &command.floor).await?;
        let prefix = command.prefix.trim();

        let mut report = BulkSeatsReport { created: vec![], skipped: vec![] };
        for offset in 0..command.count {
            let n = command.start_number.checked_add(offset).ok_or(SeatError::NumberOverflow)?;
            let seat = Seat::new(seat_number(prefix, n), command.seat_type, floor.id, tenant, actor.id());

            match self.seat_repo.insert(&seat).await {
                Ok(()) => report.created.push(seat),
                Err(RepositoryError::DuplicateKey(_)) => report.skipped.push(seat.number),
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            floor = %floor.id,
            created = report.created.len(),
            skipped = report.skipped.len(),
            "seats created"
        );
        Ok(report)
    }

    async fn list_seats(&self, actor: &Actor, floor: Option<FloorId>) -> Result<Vec<Seat>, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        Ok(self.seat_repo.find_by_tenant(&tenant, floor.as_ref()).await?)
    }

    async fn seats_by_floor(&self, actor: &Actor, floor: &FloorId) -> Result<Vec<Seat>, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let floor = self.load_floor(&tenant, floor).await?;
        Ok(self.seat_repo.find_by_tenant(&tenant, Some(&floor.id)).await?)
    }

    async fn get_seat(&self, actor: &Actor, id: &SeatId) -> Result<Seat, UseCaseError> {
        self.load_seat(&TenantScope::resolve(actor), id).await
    }

    async fn delete_seat(&self, actor: &Actor, id: &SeatId) -> Result<(), UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let seat = self
            .seat_repo
            .delete(&tenant, id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("seat", id))?;

        if let Some(holder) = seat.assigned_to {
            self.clear_member_seat(&tenant, &holder, &seat.id).await?;
            publish(
                self.event_publisher.as_ref(),
                vec![DomainEvent::Seat(SeatEvent::Released { seat: seat.id, member: holder })],
            )
            .await;
        }
        Ok(())
    }

    async fn assign_seat(&self, actor: &Actor, seat: &SeatId, member: &MemberId) -> Result<Seat, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let mut member: Member = self
            .member_repo
            .find_by_member_id(&tenant, member)
            .await?
            .ok_or_else(|| UseCaseError::not_found("member", member))?;

        if let Some(current) = member.seat() {
            if current != *seat {
                return Err(UseCaseError::Conflict(format!(
                    "member {} already holds seat {current}, unassign it first",
                    member.member_id()
                )));
            }
        }

        let assigned = match self.seat_repo.assign_if_vacant(&tenant, seat, &member.key()).await? {
            AssignOutcome::Assigned(s) => s,
            AssignOutcome::AlreadyAssigned(holder) if holder == member.key() => {
                return self.load_seat(&tenant, seat).await;
            }
            AssignOutcome::AlreadyAssigned(holder) => {
                tracing::debug!(%seat, %holder, contender = %member.member_id(), "seat assign lost");
                return Err(UseCaseError::Conflict(format!("seat {seat} is already assigned")));
            }
            AssignOutcome::NotFound => return Err(UseCaseError::not_found("seat", seat)),
        };

        member.set_seat(Some(assigned.id));
        if let Err(e) = self.member_repo.save(&member).await {
            tracing::warn!(%seat, member = %member.member_id(), error = %e, "member seat update failed, releasing seat");
            self.seat_repo.release(&tenant, seat, Some(&member.key())).await?;
            return Err(e.into());
        }

        tracing::info!(seat = %assigned.number, member = %member.member_id(), "seat assigned");
        publish(
            self.event_publisher.as_ref(),
            vec![DomainEvent::Seat(SeatEvent::Assigned { seat: assigned.id, member: member.key() })],
        )
        .await;
        Ok(assigned)
    }

    async fn unassign_seat(&self, actor: &Actor, seat: &SeatId) -> Result<Seat, UseCaseError> {
        let tenant = TenantScope::resolve(actor);
        let current = self.load_seat(&tenant, seat).await?;

        let Some(holder) = current.assigned_to else {
            return Ok(current);
        };

        let released = self
            .seat_repo
            .release(&tenant, seat, Some(&holder))
            .await?
            .ok_or_else(|| UseCaseError::Conflict(format!("seat {seat} changed hands, retry")))?;
        self.clear_member_seat(&tenant, &holder, seat).await?;

        tracing::info!(seat = %released.number, %holder, "seat released");
        publish(
            self.event_publisher.as_ref(),
            vec![DomainEvent::Seat(SeatEvent::Released { seat: released.id, member: holder })],
        )
        .await;
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::fixtures::*;
    use crate::domain::aggregates::SeatType;
    use crate::infrastructure::persistence::{
        InMemoryFloorRepository, InMemoryMemberRepository, InMemorySeatRepository,
    };
    use crate::infrastructure::RecordingEventPublisher;

    struct Harness {
        service: Arc<SeatingService>,
        members: Arc<dyn MemberRepository>,
        seats: Arc<InMemorySeatRepository>,
    }

    fn harness_with(members: Arc<dyn MemberRepository>) -> Harness {
        let seats = Arc::new(InMemorySeatRepository::new());
        let service = Arc::new(SeatingService::new(
            Arc::new(InMemoryFloorRepository::new()),
            seats.clone(),
            members.clone(),
            Arc::new(RecordingEventPublisher::new()),
        ));
        Harness { service, members, seats }
    }

    fn harness() -> Harness {
        harness_with(Arc::new(InMemoryMemberRepository::new()))
    }

    async fn floor(h: &Harness, actor: &Actor, name: &str) -> Floor {
        h.service
            .create_floor(actor, CreateFloorCommand { name: name.into(), description: None, capacity: 0 })
            .await
            .unwrap()
    }

    async fn seats(h: &Harness, actor: &Actor, floor: &Floor, count: u32) -> BulkSeatsReport {
        h.service
            .create_seats(actor, BulkSeatsCommand {
                floor: floor.id,
                seat_type: SeatType::FullDay,
                count,
                start_number: 1,
                prefix: String::new(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_floor_names_unique_per_tenant() {
        let h = harness();
        let a = admin();
        floor(&h, &a, "Ground").await;

        let dup = h
            .service
            .create_floor(&a, CreateFloorCommand { name: "ground".into(), description: None, capacity: 0 })
            .await;
        assert!(matches!(dup, Err(UseCaseError::Conflict(_))));

        floor(&h, &admin(), "Ground").await;
    }

    #[tokio::test]
    async fn test_bulk_create_skips_existing_numbers() {
        let h = harness();
        let a = admin();
        let f = floor(&h, &a, "First").await;

        let first = seats(&h, &a, &f, 3).await;
        let numbers: Vec<_> = first.created.iter().map(|s| s.number.as_str()).collect();
        assert_eq!(numbers, vec!["001", "002", "003"]);

        let second = seats(&h, &a, &f, 5).await;
        assert_eq!(second.created.len(), 2);
        assert_eq!(second.skipped, vec!["001", "002", "003"]);

        let listed = h.service.get_floor(&a, &f.id).await.unwrap();
        assert_eq!(listed.seat_count, 5);

        let too_many = h
            .service
            .create_seats(&a, BulkSeatsCommand {
                floor: f.id,
                seat_type: SeatType::Night,
                count: 0,
                start_number: 1,
                prefix: String::new(),
            })
            .await;
        assert!(matches!(too_many, Err(UseCaseError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_floor_with_seats_cannot_be_deleted() {
        let h = harness();
        let a = admin();
        let f = floor(&h, &a, "Mezzanine").await;
        let report = seats(&h, &a, &f, 1).await;

        assert!(matches!(h.service.delete_floor(&a, &f.id).await, Err(UseCaseError::Conflict(_))));

        h.service.delete_seat(&a, &report.created[0].id).await.unwrap();
        h.service.delete_floor(&a, &f.id).await.unwrap();
        assert!(matches!(h.service.get_floor(&a, &f.id).await, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_and_unassign_keep_member_in_sync() {
        let h = harness();
        let a = admin();
        let tenant = TenantScope::resolve(&a);
        let member = seed_member(h.members.as_ref(), &a, "MEM-0001").await;
        let f = floor(&h, &a, "Ground").await;
        let seat = seats(&h, &a, &f, 1).await.created.remove(0);

        let assigned = h.service.assign_seat(&a, &seat.id, member.member_id()).await.unwrap();
        assert_eq!(assigned.assigned_to, Some(member.key()));
        let stored = h.members.find_by_key(&tenant, &member.key()).await.unwrap().unwrap();
        assert_eq!(stored.seat(), Some(seat.id));

        let released = h.service.unassign_seat(&a, &seat.id).await.unwrap();
        assert!(released.is_vacant());
        let stored = h.members.find_by_key(&tenant, &member.key()).await.unwrap().unwrap();
        assert_eq!(stored.seat(), None);
    }

    #[tokio::test]
    async fn test_member_holding_a_seat_cannot_take_another() {
        let h = harness();
        let a = admin();
        let member = seed_member(h.members.as_ref(), &a, "MEM-0001").await;
        let f = floor(&h, &a, "Ground").await;
        let report = seats(&h, &a, &f, 2).await;

        h.service.assign_seat(&a, &report.created[0].id, member.member_id()).await.unwrap();
        let again = h.service.assign_seat(&a, &report.created[0].id, member.member_id()).await;
        assert!(again.is_ok());

        let other = h.service.assign_seat(&a, &report.created[1].id, member.member_id()).await;
        assert!(matches!(other, Err(UseCaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unknown_member_or_foreign_seat() {
        let h = harness();
        let a = admin();
        let b = admin();
        let f = floor(&h, &a, "Ground").await;
        let seat = seats(&h, &a, &f, 1).await.created.remove(0);
        let theirs = seed_member(h.members.as_ref(), &b, "MEM-0001").await;

        let code = MemberId::parse("MEM-0001").unwrap();
        assert!(matches!(h.service.assign_seat(&a, &seat.id, &code).await, Err(UseCaseError::NotFound(_))));
        assert!(matches!(
            h.service.assign_seat(&b, &seat.id, theirs.member_id()).await,
            Err(UseCaseError::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_assign_has_one_winner() {
        let h = harness();
        let a = admin();
        let f = floor(&h, &a, "Race").await;
        let seat = seats(&h, &a, &f, 1).await.created.remove(0);
        let first = seed_member(h.members.as_ref(), &a, "MEM-0001").await;
        let second = seed_member(h.members.as_ref(), &a, "MEM-0002").await;

        let seat_id = seat.id;
        let mut tasks = vec![];
        for member in [first.member_id().clone(), second.member_id().clone()] {
            let service = h.service.clone();
            tasks.push(tokio::spawn(async move { service.assign_seat(&a, &seat_id, &member).await }));
        }

        let mut wins = 0;
        let mut conflicts = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => wins += 1,
                Err(UseCaseError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!((wins, conflicts), (1, 1));

        let tenant = TenantScope::resolve(&a);
        let stored = h.seats.find_by_id(&tenant, &seat.id).await.unwrap().unwrap();
        let holder = stored.assigned_to.unwrap();
        assert!(holder == first.key() || holder == second.key());
    }

    #[tokio::test]
    async fn test_failed_member_write_releases_seat() {
        let h = harness_with(Arc::new(FailingSaveMemberRepository::new()));
        let a = admin();
        let member = seed_member(h.members.as_ref(), &a, "MEM-0001").await;
        let f = floor(&h, &a, "Ground").await;
        let seat = seats(&h, &a, &f, 1).await.created.remove(0);

        let err = h.service.assign_seat(&a, &seat.id, member.member_id()).await.unwrap_err();
        assert!(matches!(err, UseCaseError::Repository(_)));

        let stored = h.service.get_seat(&a, &seat.id).await.unwrap();
        assert!(stored.is_vacant());
    }
}
