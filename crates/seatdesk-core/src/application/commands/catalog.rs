//! Plan catalog service

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::aggregates::{NewPlan, Plan, PlanPatch};
use crate::domain::services::TenantScope;
use crate::domain::value_objects::{Actor, PlanId, TenantId};
use crate::ports::inbound::{PlanUseCases, UseCaseError};
use crate::ports::outbound::PlanRepository;

pub struct PlanService {
    plan_repo: Arc<dyn PlanRepository>,
}

impl PlanService {
    pub fn new(plan_repo: Arc<dyn PlanRepository>) -> Self {
        Self { plan_repo }
    }

    async fn load(&self, tenant: &TenantId, id: &PlanId) -> Result<Plan, UseCaseError> {
        self.plan_repo
            .find_by_id(tenant, id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("plan", id))
    }
}

#[async_trait]
impl PlanUseCases for PlanService {
    async fn create_plan(&self, actor: &Actor, command: NewPlan) -> Result<Plan, UseCaseError> {
        let plan = Plan::create(command, TenantScope::resolve(actor), actor.id())?;
        self.plan_repo.save(&plan).await?;
        tracing::info!(plan = %plan.id, name = %plan.name, "plan created");
        Ok(plan)
    }

    async fn list_plans(&self, actor: &Actor) -> Result<Vec<Plan>, UseCaseError> {
        Ok(self.plan_repo.find_by_tenant(&TenantScope::resolve(actor)).await?)
    }

    async fn get_plan(&self, actor: &Actor, id: &PlanId) -> Result<Plan, UseCaseError> {
        self.load(&TenantScope::resolve(actor), id).await
    }

    async fn update_plan(&self, actor: &Actor, id: &PlanId, patch: PlanPatch) -> Result<Plan, UseCaseError> {
        let mut plan = self.load(&TenantScope::resolve(actor), id).await?;
        plan.apply(patch)?;
        self.plan_repo.save(&plan).await?;
        Ok(plan)
    }

    async fn set_plan_enabled(&self, actor: &Actor, id: &PlanId, enabled: bool) -> Result<Plan, UseCaseError> {
        let mut plan = self.load(&TenantScope::resolve(actor), id).await?;
        plan.set_enabled(enabled);
        self.plan_repo.save(&plan).await?;
        tracing::info!(plan = %plan.id, enabled, "plan availability changed");
        Ok(plan)
    }

    /// Existing billings keep their plan id; only the catalog entry goes away
    async fn delete_plan(&self, actor: &Actor, id: &PlanId) -> Result<(), UseCaseError> {
        if !self.plan_repo.delete(&TenantScope::resolve(actor), id).await? {
            return Err(UseCaseError::not_found("plan", id));
        }
        Ok(())
    }
}
