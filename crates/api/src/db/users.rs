//! The user aggregate: a user row plus whichever owned collections a
//! [`FetchPlan`] asks for.
//!
//! Hydration issues one batched child query per relation for the whole
//! result set, so listing N users costs at most four extra queries.

use std::collections::HashMap;

use ecosave_core::UserId;
use rust_decimal::Decimal;

use super::repository::Repository;
use super::{Database, RepositoryError};
use crate::models::{
    Address, ConsumptionRecord, Device, DeviceDetail, LoyaltyPoint, User, UserDetail,
};

/// A collection owned by a user that can be loaded alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Addresses,
    LoyaltyPoints,
    Devices,
    /// Consumption records of each device. Implies [`Relation::Devices`].
    DeviceConsumption,
}

/// Named, static set of relations to hydrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    relations: &'static [Relation],
}

impl FetchPlan {
    /// The user row only.
    pub const BARE: Self = Self { relations: &[] };

    /// Collection listing: devices, addresses and points.
    pub const USER_SUMMARY: Self = Self {
        relations: &[Relation::Devices, Relation::Addresses, Relation::LoyaltyPoints],
    };

    /// Single-user view: everything, including consumption per device.
    pub const USER_DETAIL: Self = Self {
        relations: &[
            Relation::DeviceConsumption,
            Relation::Addresses,
            Relation::LoyaltyPoints,
        ],
    };

    /// What the spend evaluation needs.
    pub const SPEND: Self = Self {
        relations: &[Relation::DeviceConsumption],
    };

    #[must_use]
    pub fn includes(self, relation: Relation) -> bool {
        self.relations.iter().any(|r| {
            *r == relation || (relation == Relation::Devices && *r == Relation::DeviceConsumption)
        })
    }
}

/// Reads of the user aggregate.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All users, hydrated per `plan`.
    ///
    /// # Errors
    ///
    /// Returns an error if any backend query fails.
    pub async fn list(&self, plan: FetchPlan) -> Result<Vec<UserDetail>, RepositoryError> {
        let users = Repository::<User>::new(self.db).list().await?;
        self.hydrate(users, plan).await
    }

    /// One user, hydrated per `plan`.
    ///
    /// # Errors
    ///
    /// Returns an error if any backend query fails.
    pub async fn get(
        &self,
        id: UserId,
        plan: FetchPlan,
    ) -> Result<Option<UserDetail>, RepositoryError> {
        let Some(user) = Repository::<User>::new(self.db).get(id).await? else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![user], plan).await?.pop())
    }

    /// Sum of consumption cost over every device of the user.
    ///
    /// # Errors
    ///
    /// Returns an error if any backend query fails.
    pub async fn total_spend(&self, id: UserId) -> Result<Option<Decimal>, RepositoryError> {
        Ok(self
            .get(id, FetchPlan::SPEND)
            .await?
            .map(|user| user.total_spend()))
    }

    async fn hydrate(
        &self,
        users: Vec<User>,
        plan: FetchPlan,
    ) -> Result<Vec<UserDetail>, RepositoryError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        let user_ids: Vec<i32> = users.iter().map(|u| u.id.as_i32()).collect();

        let mut addresses = if plan.includes(Relation::Addresses) {
            let rows = Repository::<Address>::new(self.db)
                .list_by_parent(Address::OWNER, &user_ids)
                .await?;
            Some(group_by(rows, |a| a.user_id.as_i32()))
        } else {
            None
        };

        let mut points = if plan.includes(Relation::LoyaltyPoints) {
            let rows = Repository::<LoyaltyPoint>::new(self.db)
                .list_by_parent(LoyaltyPoint::OWNER, &user_ids)
                .await?;
            Some(group_by(rows, |p| p.user_id.as_i32()))
        } else {
            None
        };

        let mut devices = if plan.includes(Relation::Devices) {
            let rows = Repository::<Device>::new(self.db)
                .list_by_parent(Device::OWNER, &user_ids)
                .await?;
            let details = self
                .attach_consumption(rows, plan.includes(Relation::DeviceConsumption))
                .await?;
            Some(group_by(details, |d| d.device.user_id.as_i32()))
        } else {
            None
        };

        let with_spend = plan.includes(Relation::DeviceConsumption);
        users
            .into_iter()
            .map(|user| {
                let id = user.id.as_i32();
                let detail = UserDetail::new(
                    user,
                    take_group(addresses.as_mut(), id),
                    take_group(points.as_mut(), id),
                    take_group(devices.as_mut(), id),
                );
                if !with_spend {
                    return Ok(detail);
                }
                detail.with_average_spend().ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "consumption total of user {id} overflows"
                    ))
                })
            })
            .collect()
    }

    async fn attach_consumption(
        &self,
        devices: Vec<Device>,
        with_consumption: bool,
    ) -> Result<Vec<DeviceDetail>, RepositoryError> {
        if !with_consumption {
            return Ok(devices.into_iter().map(DeviceDetail::bare).collect());
        }

        let device_ids: Vec<i32> = devices.iter().map(|d| d.id.as_i32()).collect();
        let records = Repository::<ConsumptionRecord>::new(self.db)
            .list_by_parent(ConsumptionRecord::DEVICE, &device_ids)
            .await?;
        let mut by_device = group_by(records, |c| c.device_id.as_i32());

        Ok(devices
            .into_iter()
            .map(|device| {
                let records = by_device.remove(&device.id.as_i32()).unwrap_or_default();
                DeviceDetail::with_consumption(device, records)
            })
            .collect())
    }
}

fn group_by<T>(items: Vec<T>, key: impl Fn(&T) -> i32) -> HashMap<i32, Vec<T>> {
    let mut groups: HashMap<i32, Vec<T>> = HashMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

fn take_group<T>(groups: Option<&mut HashMap<i32, Vec<T>>>, id: i32) -> Option<Vec<T>> {
    groups.map(|groups| groups.remove(&id).unwrap_or_default())
}
