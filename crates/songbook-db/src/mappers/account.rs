//! Account entity <-> model mapper

use songbook_core::entities::{Account, AuthProvider};
use songbook_core::error::DomainError;
use songbook_core::value_objects::AccountId;

use crate::models::AccountModel;

impl TryFrom<AccountModel> for Account {
    type Error = DomainError;

    fn try_from(model: AccountModel) -> Result<Self, Self::Error> {
        let provider = model
            .provider
            .parse::<AuthProvider>()
            .map_err(DomainError::DatabaseError)?;

        Ok(Account {
            id: AccountId::from_uuid(model.id),
            email: model.email,
            username: model.username,
            provider,
            picture_url: model.picture_url,
            is_blocked: model.is_blocked,
            is_admin: model.is_admin,
            delete_requested_at: model.delete_requested_at,
            purge_deadline: model.purge_deadline,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn model(provider: &str) -> AccountModel {
        let now = Utc::now();
        AccountModel {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            provider: provider.to_string(),
            picture_url: None,
            is_blocked: false,
            is_admin: false,
            delete_requested_at: None,
            purge_deadline: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_entity() {
        let model = model("federated");
        let id = model.id;
        let account = Account::try_from(model).unwrap();
        assert_eq!(account.id.into_inner(), id);
        assert_eq!(account.provider, AuthProvider::Federated);
    }

    #[test]
    fn test_unknown_provider_is_database_error() {
        let result = Account::try_from(model("myspace"));
        assert!(matches!(result, Err(DomainError::DatabaseError(_))));
    }
}
