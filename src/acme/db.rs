use super::types::{Account, Authorization, Certificate, Challenge, Nonce, Order};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcmeDbError {
    /// The entity does not exist. Callers use this to decide between creating
    /// a new record and reusing an existing one.
    #[error("not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("mock error: {0}")]
    Mock(String),
}

impl AcmeDbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AcmeDbError::NotFound)
    }
}

/// Persistence the ACME protocol handlers rely on. Create methods may fill in
/// generated fields such as the id.
pub trait AcmeDb: Send + Sync {
    fn create_account(&self, account: &mut Account) -> Result<(), AcmeDbError>;
    fn get_account(&self, id: &str) -> Result<Account, AcmeDbError>;
    fn get_account_by_key_id(&self, kid: &str) -> Result<Account, AcmeDbError>;
    fn update_account(&self, account: &Account) -> Result<(), AcmeDbError>;

    fn create_nonce(&self) -> Result<Nonce, AcmeDbError>;
    /// Consumes a nonce; a nonce that was never issued or already used is
    /// reported as an error.
    fn delete_nonce(&self, nonce: &Nonce) -> Result<(), AcmeDbError>;

    fn create_authorization(&self, authz: &mut Authorization) -> Result<(), AcmeDbError>;
    fn get_authorization(&self, id: &str) -> Result<Authorization, AcmeDbError>;
    fn update_authorization(&self, authz: &Authorization) -> Result<(), AcmeDbError>;
    fn get_authorizations_by_account_id(
        &self,
        account_id: &str,
    ) -> Result<Vec<Authorization>, AcmeDbError>;

    fn create_certificate(&self, cert: &mut Certificate) -> Result<(), AcmeDbError>;
    fn get_certificate(&self, id: &str) -> Result<Certificate, AcmeDbError>;
    fn get_certificate_by_serial(&self, serial: &str) -> Result<Certificate, AcmeDbError>;

    fn create_challenge(&self, challenge: &mut Challenge) -> Result<(), AcmeDbError>;
    fn get_challenge(&self, id: &str, authz_id: &str) -> Result<Challenge, AcmeDbError>;
    fn update_challenge(&self, challenge: &Challenge) -> Result<(), AcmeDbError>;

    fn create_order(&self, order: &mut Order) -> Result<(), AcmeDbError>;
    fn get_order(&self, id: &str) -> Result<Order, AcmeDbError>;
    fn get_orders_by_account_id(&self, account_id: &str) -> Result<Vec<String>, AcmeDbError>;
    fn update_order(&self, order: &Order) -> Result<(), AcmeDbError>;
}
