use super::{AlertService, Authorization, ScheduledAlert};
use crate::error::{Result, ServiceDueError};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Alert registry held in memory. Used by tests and as a stand-in when no
/// platform alert service exists.
pub struct InMemoryAlertService {
    alerts: BTreeMap<Uuid, ScheduledAlert>,
    authorization: Authorization,
    acknowledged: bool,
    registrations: usize,
}

impl Default for InMemoryAlertService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAlertService {
    pub fn new() -> Self {
        Self {
            alerts: BTreeMap::new(),
            authorization: Authorization::Granted,
            acknowledged: false,
            registrations: 0,
        }
    }

    pub fn with_authorization(mut self, authorization: Authorization) -> Self {
        self.authorization = authorization;
        self
    }

    pub fn set_authorization(&mut self, authorization: Authorization) {
        self.authorization = authorization;
    }

    /// Total number of successful `register` calls.
    pub fn registrations(&self) -> usize {
        self.registrations
    }
}

impl AlertService for InMemoryAlertService {
    fn authorization(&self) -> Authorization {
        self.authorization
    }

    fn register(&mut self, alert: ScheduledAlert) -> Result<()> {
        if self.authorization == Authorization::Denied {
            return Err(ServiceDueError::AlertAuthorizationDenied);
        }
        self.alerts.insert(alert.id, alert);
        self.registrations += 1;
        Ok(())
    }

    fn cancel(&mut self, id: &Uuid) -> Result<()> {
        self.alerts.remove(id);
        Ok(())
    }

    fn pending(&self) -> Result<Vec<ScheduledAlert>> {
        Ok(self.alerts.values().cloned().collect())
    }

    fn denial_acknowledged(&self) -> bool {
        self.acknowledged
    }

    fn acknowledge_denial(&mut self) -> Result<()> {
        self.acknowledged = true;
        Ok(())
    }
}
