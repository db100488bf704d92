use super::{AlertService, Authorization, ScheduledAlert};
use crate::error::{Result, ServiceDueError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

const ALERTS_FILENAME: &str = "alerts.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Registry {
    #[serde(default)]
    denial_notice_shown: bool,
    #[serde(default)]
    alerts: Vec<ScheduledAlert>,
}

/// Alert registry kept in `alerts.json`, used by the CLI in place of a
/// platform notification center. Authorization comes from configuration.
pub struct FileAlertRegistry {
    root: PathBuf,
    authorization: Authorization,
}

impl FileAlertRegistry {
    pub fn new<P: Into<PathBuf>>(root: P, authorization: Authorization) -> Self {
        Self {
            root: root.into(),
            authorization,
        }
    }

    fn path(&self) -> PathBuf {
        self.root.join(ALERTS_FILENAME)
    }

    fn load(&self) -> Result<Registry> {
        let path = self.path();
        if !path.exists() {
            return Ok(Registry::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, registry: &Registry) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        let content = serde_json::to_string_pretty(registry)?;
        let tmp_file = self.root.join(format!(".alerts-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content)?;
        fs::rename(&tmp_file, self.path())?;
        Ok(())
    }
}

impl AlertService for FileAlertRegistry {
    fn authorization(&self) -> Authorization {
        self.authorization
    }

    fn register(&mut self, alert: ScheduledAlert) -> Result<()> {
        if self.authorization == Authorization::Denied {
            return Err(ServiceDueError::AlertAuthorizationDenied);
        }
        let mut registry = self.load()?;
        registry.alerts.retain(|a| a.id != alert.id);
        registry.alerts.push(alert);
        registry.alerts.sort_by(|a, b| a.fire_at.cmp(&b.fire_at));
        self.save(&registry)
    }

    fn cancel(&mut self, id: &Uuid) -> Result<()> {
        let mut registry = self.load()?;
        let before = registry.alerts.len();
        registry.alerts.retain(|a| &a.id != id);
        if registry.alerts.len() != before {
            self.save(&registry)?;
        }
        Ok(())
    }

    fn pending(&self) -> Result<Vec<ScheduledAlert>> {
        Ok(self.load()?.alerts)
    }

    fn denial_acknowledged(&self) -> bool {
        self.load().map(|r| r.denial_notice_shown).unwrap_or(false)
    }

    fn acknowledge_denial(&mut self) -> Result<()> {
        let mut registry = self.load()?;
        registry.denial_notice_shown = true;
        self.save(&registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::AlertPayload;
    use chrono::NaiveDate;

    fn alert(id: Uuid, day: u32) -> ScheduledAlert {
        ScheduledAlert {
            id,
            fire_at: NaiveDate::from_ymd_opt(2025, 5, day)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            payload: AlertPayload {
                reminder_id: id,
                title: "Inspection".to_string(),
                body: "Inspection is due".to_string(),
            },
        }
    }

    #[test]
    fn register_replaces_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FileAlertRegistry::new(dir.path(), Authorization::Granted);
        let id = Uuid::new_v4();

        registry.register(alert(id, 10)).unwrap();
        registry.register(alert(id, 12)).unwrap();

        let pending = registry.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].fire_at.date().to_string(), "2025-05-12");
    }

    #[test]
    fn cancel_unknown_id_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FileAlertRegistry::new(dir.path(), Authorization::Granted);
        assert!(registry.cancel(&Uuid::new_v4()).is_ok());
        assert!(!dir.path().join(ALERTS_FILENAME).exists());
    }

    #[test]
    fn denied_registry_refuses_registration() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FileAlertRegistry::new(dir.path(), Authorization::Denied);
        let result = registry.register(alert(Uuid::new_v4(), 10));
        assert!(matches!(result, Err(ServiceDueError::AlertAuthorizationDenied)));
    }

    #[test]
    fn denial_acknowledgement_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FileAlertRegistry::new(dir.path(), Authorization::Denied);
        assert!(!registry.denial_acknowledged());
        registry.acknowledge_denial().unwrap();

        let reopened = FileAlertRegistry::new(dir.path(), Authorization::Denied);
        assert!(reopened.denial_acknowledged());
    }
}
