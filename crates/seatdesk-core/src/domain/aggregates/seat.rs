//! Seat Aggregate
//!
//! The seat record is the source of truth for who sits where.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{FloorId, MemberKey, SeatId, TenantId, UserId};

/// Largest number of seats one bulk request may create
pub const MAX_BULK_SEATS: u32 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    Morning,
    Afternoon,
    Evening,
    Night,
    FullDay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
    Reserved,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Seat {
    pub id: SeatId,
    pub number: String,
    pub seat_type: SeatType,
    pub floor: FloorId,
    pub assigned_to: Option<MemberKey>,
    pub reserved: bool,
    pub status: SeatStatus,
    pub created_by: UserId,
    pub root_admin: TenantId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Seat {
    pub fn new(
        number: String,
        seat_type: SeatType,
        floor: FloorId,
        tenant: TenantId,
        created_by: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SeatId::new(),
            number,
            seat_type,
            floor,
            assigned_to: None,
            reserved: false,
            status: SeatStatus::Available,
            created_by,
            root_admin: tenant,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_vacant(&self) -> bool {
        self.assigned_to.is_none()
    }

    pub fn assign(&mut self, member: MemberKey) -> Result<(), SeatError> {
        if let Some(current) = self.assigned_to {
            return Err(SeatError::Occupied(current));
        }
        self.assigned_to = Some(member);
        self.reserved = false;
        self.status = SeatStatus::Occupied;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Clear the assignment, returning the member that held the seat
    pub fn release(&mut self) -> Option<MemberKey> {
        let previous = self.assigned_to.take();
        if self.status == SeatStatus::Occupied {
            self.status = SeatStatus::Available;
        }
        self.updated_at = Utc::now();
        previous
    }
}

/// Seat label for the `index`-th seat of a bulk request
///
/// `prefix` and the running number are concatenated, then left-padded with
/// `0` to three characters: `("", 7)` gives `007`, `("A", 5)` gives `0A5`.
pub fn seat_number(prefix: &str, number: u32) -> String {
    format!("{:0>3}", format!("{prefix}{number}"))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatError {
    #[error("seat is already assigned to member {0}")]
    Occupied(MemberKey),
    #[error("seat count must be between 1 and 500, got {0}")]
    InvalidCount(u32),
    #[error("seat numbering overflows")]
    NumberOverflow,
}
