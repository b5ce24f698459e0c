//! Subadmin accounts

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::RegisterSubadminCommand;
use crate::domain::aggregates::UserAccount;
use crate::domain::value_objects::Actor;
use crate::ports::inbound::{AccountUseCases, UseCaseError};
use crate::ports::outbound::AccountRepository;

pub struct AccountService {
    account_repo: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(account_repo: Arc<dyn AccountRepository>) -> Self {
        Self { account_repo }
    }
}

fn require_admin(actor: &Actor) -> Result<(), UseCaseError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(UseCaseError::Unauthorized("only an admin can manage subadmins".into()))
    }
}

#[async_trait]
impl AccountUseCases for AccountService {
    async fn register_subadmin(&self, actor: &Actor, command: RegisterSubadminCommand) -> Result<UserAccount, UseCaseError> {
        require_admin(actor)?;
        if command.username.trim().is_empty() {
            return Err(UseCaseError::ValidationFailed("username is required".into()));
        }

        let account = UserAccount::subadmin(&command.username, actor.id());
        self.account_repo.insert(&account).await?;

        tracing::info!(account = %account.id, username = %account.username, parent = %actor.id(), "subadmin registered");
        Ok(account)
    }

    async fn list_subadmins(&self, actor: &Actor) -> Result<Vec<UserAccount>, UseCaseError> {
        require_admin(actor)?;
        Ok(self.account_repo.subadmins_of(&actor.id()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::fixtures::*;
    use crate::domain::value_objects::Role;
    use crate::infrastructure::persistence::InMemoryAccountRepository;

    fn register(username: &str) -> RegisterSubadminCommand {
        RegisterSubadminCommand { username: username.into() }
    }

    #[tokio::test]
    async fn test_admin_registers_subadmins() {
        let service = AccountService::new(Arc::new(InMemoryAccountRepository::new()));
        let a = admin();

        let account = service.register_subadmin(&a, register(" Desk.Clerk ")).await.unwrap();
        assert_eq!(account.username, "desk.clerk");
        assert_eq!(account.role, Role::Subadmin { parent: a.id() });
        assert_eq!(account.actor().id(), account.id);

        let dup = service.register_subadmin(&a, register("DESK.CLERK")).await;
        assert!(matches!(dup, Err(UseCaseError::Conflict(_))));

        assert_eq!(service.list_subadmins(&a).await.unwrap().len(), 1);
        assert!(service.list_subadmins(&admin()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subadmin_cannot_manage_accounts() {
        let service = AccountService::new(Arc::new(InMemoryAccountRepository::new()));
        let sub = subadmin_of(&admin());

        assert!(matches!(service.register_subadmin(&sub, register("x")).await, Err(UseCaseError::Unauthorized(_))));
        assert!(matches!(service.list_subadmins(&sub).await, Err(UseCaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_blank_username_rejected() {
        let service = AccountService::new(Arc::new(InMemoryAccountRepository::new()));
        let result = service.register_subadmin(&admin(), register("   ")).await;
        assert!(matches!(result, Err(UseCaseError::ValidationFailed(_))));
    }
}
