use std::fmt;

use super::db::{AcmeDb, AcmeDbError};
use super::types::{Account, Authorization, Certificate, Challenge, Nonce, Order};

type Hook<A, R> = Option<Box<dyn Fn(A) -> Result<R, AcmeDbError> + Send + Sync>>;
type RefHook<A, R> = Option<Box<dyn for<'a> Fn(&'a A) -> Result<R, AcmeDbError> + Send + Sync>>;
type MutHook<A> = Option<Box<dyn for<'a> Fn(&'a mut A) -> Result<(), AcmeDbError> + Send + Sync>>;
type StrHook<R> = Option<Box<dyn for<'a> Fn(&'a str) -> Result<R, AcmeDbError> + Send + Sync>>;

/// Canned value returned by the getters of [`MockAcmeDb`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockReturn {
    Account(Account),
    Nonce(Nonce),
    Authorization(Authorization),
    Authorizations(Vec<Authorization>),
    Certificate(Certificate),
    Challenge(Challenge),
    Order(Order),
    OrderIds(Vec<String>),
}

/// Configurable [`AcmeDb`] double.
///
/// Each method answers, in order: with its hook if set; with `mock_error` if
/// set; with `mock_ret` if it holds a value of the right type. Methods that
/// return nothing fall back to `Ok(())`; getters without a usable canned
/// value fail with [`AcmeDbError::Mock`].
#[derive(Default)]
pub struct MockAcmeDb {
    pub mock_create_account: MutHook<Account>,
    pub mock_get_account: StrHook<Account>,
    pub mock_get_account_by_key_id: StrHook<Account>,
    pub mock_update_account: RefHook<Account, ()>,

    pub mock_create_nonce: Hook<(), Nonce>,
    pub mock_delete_nonce: RefHook<Nonce, ()>,

    pub mock_create_authorization: MutHook<Authorization>,
    pub mock_get_authorization: StrHook<Authorization>,
    pub mock_update_authorization: RefHook<Authorization, ()>,
    pub mock_get_authorizations_by_account_id: StrHook<Vec<Authorization>>,

    pub mock_create_certificate: MutHook<Certificate>,
    pub mock_get_certificate: StrHook<Certificate>,
    pub mock_get_certificate_by_serial: StrHook<Certificate>,

    pub mock_create_challenge: MutHook<Challenge>,
    pub mock_get_challenge: Option<Box<dyn Fn(&str, &str) -> Result<Challenge, AcmeDbError> + Send + Sync>>,
    pub mock_update_challenge: RefHook<Challenge, ()>,

    pub mock_create_order: MutHook<Order>,
    pub mock_get_order: StrHook<Order>,
    pub mock_get_orders_by_account_id: StrHook<Vec<String>>,
    pub mock_update_order: RefHook<Order, ()>,

    pub mock_ret: Option<MockReturn>,
    pub mock_error: Option<AcmeDbError>,
}

impl MockAcmeDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(value: MockReturn) -> Self {
        Self {
            mock_ret: Some(value),
            ..Self::default()
        }
    }

    pub fn failing(error: AcmeDbError) -> Self {
        Self {
            mock_error: Some(error),
            ..Self::default()
        }
    }

    fn unit(&self) -> Result<(), AcmeDbError> {
        match &self.mock_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn canned<T>(
        &self,
        method: &str,
        pick: impl FnOnce(&MockReturn) -> Option<T>,
    ) -> Result<T, AcmeDbError> {
        if let Some(err) = &self.mock_error {
            return Err(err.clone());
        }
        self.mock_ret.as_ref().and_then(pick).ok_or_else(|| {
            AcmeDbError::Mock(format!("{method}: no canned return value of the expected type"))
        })
    }
}

impl fmt::Debug for MockAcmeDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockAcmeDb")
            .field("mock_ret", &self.mock_ret)
            .field("mock_error", &self.mock_error)
            .finish_non_exhaustive()
    }
}

impl AcmeDb for MockAcmeDb {
    fn create_account(&self, account: &mut Account) -> Result<(), AcmeDbError> {
        match &self.mock_create_account {
            Some(hook) => hook(account),
            None => self.unit(),
        }
    }

    fn get_account(&self, id: &str) -> Result<Account, AcmeDbError> {
        match &self.mock_get_account {
            Some(hook) => hook(id),
            None => self.canned("get_account", |ret| match ret {
                MockReturn::Account(account) => Some(account.clone()),
                _ => None,
            }),
        }
    }

    fn get_account_by_key_id(&self, kid: &str) -> Result<Account, AcmeDbError> {
        match &self.mock_get_account_by_key_id {
            Some(hook) => hook(kid),
            None => self.canned("get_account_by_key_id", |ret| match ret {
                MockReturn::Account(account) => Some(account.clone()),
                _ => None,
            }),
        }
    }

    fn update_account(&self, account: &Account) -> Result<(), AcmeDbError> {
        match &self.mock_update_account {
            Some(hook) => hook(account),
            None => self.unit(),
        }
    }

    fn create_nonce(&self) -> Result<Nonce, AcmeDbError> {
        match &self.mock_create_nonce {
            Some(hook) => hook(()),
            None => self.canned("create_nonce", |ret| match ret {
                MockReturn::Nonce(nonce) => Some(nonce.clone()),
                _ => None,
            }),
        }
    }

    fn delete_nonce(&self, nonce: &Nonce) -> Result<(), AcmeDbError> {
        match &self.mock_delete_nonce {
            Some(hook) => hook(nonce),
            None => self.unit(),
        }
    }

    fn create_authorization(&self, authz: &mut Authorization) -> Result<(), AcmeDbError> {
        match &self.mock_create_authorization {
            Some(hook) => hook(authz),
            None => self.unit(),
        }
    }

    fn get_authorization(&self, id: &str) -> Result<Authorization, AcmeDbError> {
        match &self.mock_get_authorization {
            Some(hook) => hook(id),
            None => self.canned("get_authorization", |ret| match ret {
                MockReturn::Authorization(authz) => Some(authz.clone()),
                _ => None,
            }),
        }
    }

    fn update_authorization(&self, authz: &Authorization) -> Result<(), AcmeDbError> {
        match &self.mock_update_authorization {
            Some(hook) => hook(authz),
            None => self.unit(),
        }
    }

    fn get_authorizations_by_account_id(
        &self,
        account_id: &str,
    ) -> Result<Vec<Authorization>, AcmeDbError> {
        match &self.mock_get_authorizations_by_account_id {
            Some(hook) => hook(account_id),
            None => self.canned("get_authorizations_by_account_id", |ret| match ret {
                MockReturn::Authorizations(list) => Some(list.clone()),
                _ => None,
            }),
        }
    }

    fn create_certificate(&self, cert: &mut Certificate) -> Result<(), AcmeDbError> {
        match &self.mock_create_certificate {
            Some(hook) => hook(cert),
            None => self.unit(),
        }
    }

    fn get_certificate(&self, id: &str) -> Result<Certificate, AcmeDbError> {
        match &self.mock_get_certificate {
            Some(hook) => hook(id),
            None => self.canned("get_certificate", |ret| match ret {
                MockReturn::Certificate(cert) => Some(cert.clone()),
                _ => None,
            }),
        }
    }

    fn get_certificate_by_serial(&self, serial: &str) -> Result<Certificate, AcmeDbError> {
        match &self.mock_get_certificate_by_serial {
            Some(hook) => hook(serial),
            None => self.canned("get_certificate_by_serial", |ret| match ret {
                MockReturn::Certificate(cert) => Some(cert.clone()),
                _ => None,
            }),
        }
    }

    fn create_challenge(&self, challenge: &mut Challenge) -> Result<(), AcmeDbError> {
        match &self.mock_create_challenge {
            Some(hook) => hook(challenge),
            None => self.unit(),
        }
    }

    fn get_challenge(&self, id: &str, authz_id: &str) -> Result<Challenge, AcmeDbError> {
        match &self.mock_get_challenge {
            Some(hook) => hook(id, authz_id),
            None => self.canned("get_challenge", |ret| match ret {
                MockReturn::Challenge(challenge) => Some(challenge.clone()),
                _ => None,
            }),
        }
    }

    fn update_challenge(&self, challenge: &Challenge) -> Result<(), AcmeDbError> {
        match &self.mock_update_challenge {
            Some(hook) => hook(challenge),
            None => self.unit(),
        }
    }

    fn create_order(&self, order: &mut Order) -> Result<(), AcmeDbError> {
        match &self.mock_create_order {
            Some(hook) => hook(order),
            None => self.unit(),
        }
    }

    fn get_order(&self, id: &str) -> Result<Order, AcmeDbError> {
        match &self.mock_get_order {
            Some(hook) => hook(id),
            None => self.canned("get_order", |ret| match ret {
                MockReturn::Order(order) => Some(order.clone()),
                _ => None,
            }),
        }
    }

    fn get_orders_by_account_id(&self, account_id: &str) -> Result<Vec<String>, AcmeDbError> {
        match &self.mock_get_orders_by_account_id {
            Some(hook) => hook(account_id),
            None => self.canned("get_orders_by_account_id", |ret| match ret {
                MockReturn::OrderIds(ids) => Some(ids.clone()),
                _ => None,
            }),
        }
    }

    fn update_order(&self, order: &Order) -> Result<(), AcmeDbError> {
        match &self.mock_update_order {
            Some(hook) => hook(order),
            None => self.unit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acme::Status;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn hook_takes_precedence() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let db = MockAcmeDb {
            mock_get_account_by_key_id: Some(Box::new(move |kid: &str| {
                seen.fetch_add(1, Ordering::SeqCst);
                if kid == "known" {
                    Ok(Account {
                        id: "acc-1".to_string(),
                        status: Status::Valid,
                        ..Account::default()
                    })
                } else {
                    Err(AcmeDbError::NotFound)
                }
            })),
            mock_error: Some(AcmeDbError::Storage("ignored".to_string())),
            ..MockAcmeDb::default()
        };

        assert_eq!(db.get_account_by_key_id("known").expect("account").id, "acc-1");
        assert!(db
            .get_account_by_key_id("other")
            .expect_err("missing")
            .is_not_found());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn create_hook_can_assign_ids() {
        let db = MockAcmeDb {
            mock_create_order: Some(Box::new(|order: &mut Order| {
                order.id = "ord-1".to_string();
                Ok(())
            })),
            ..MockAcmeDb::default()
        };
        let mut order = Order::default();
        db.create_order(&mut order).expect("create");
        assert_eq!(order.id, "ord-1");
    }

    #[test]
    fn configured_error_applies_to_every_method() {
        let db = MockAcmeDb::failing(AcmeDbError::Storage("down".to_string()));
        assert_eq!(
            db.update_order(&Order::default()),
            Err(AcmeDbError::Storage("down".to_string()))
        );
        assert_eq!(
            db.create_nonce(),
            Err(AcmeDbError::Storage("down".to_string()))
        );
    }

    #[test]
    fn canned_value_is_returned_for_matching_type() {
        let db = MockAcmeDb::returning(MockReturn::OrderIds(vec!["o1".into(), "o2".into()]));
        assert_eq!(
            db.get_orders_by_account_id("acc").expect("ids"),
            vec!["o1".to_string(), "o2".to_string()]
        );
        match db.get_order("o1") {
            Err(AcmeDbError::Mock(msg)) => assert!(msg.starts_with("get_order")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unconfigured_mock_defaults() {
        let db = MockAcmeDb::new();
        db.delete_nonce(&Nonce("n".to_string())).expect("unit default");
        db.create_account(&mut Account::default()).expect("unit default");
        assert!(matches!(db.get_certificate("c1"), Err(AcmeDbError::Mock(_))));
    }

    #[test]
    fn usable_as_trait_object() {
        let db: Box<dyn AcmeDb> = Box::new(MockAcmeDb::returning(MockReturn::Nonce(Nonce(
            "abc".to_string(),
        ))));
        assert_eq!(db.create_nonce().expect("nonce").as_str(), "abc");
    }
}
