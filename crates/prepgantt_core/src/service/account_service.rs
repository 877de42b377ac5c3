//! Account identity and named plan use-case service.
//!
//! # Responsibility
//! - Assert a user identity from an email-shaped identifier.
//! - Store, list and delete named full-board snapshots ("plans") per user.
//! - Track which plan the working board was last opened from or saved to.
//!
//! # Invariants
//! - Identity is asserted, not verified; there are no passwords or tokens.
//! - The same normalized identifier always maps to the same `UserId`.
//! - A plan is a full snapshot; saving replaces the stored plan with that id.
//! - Plan listings only contain plans owned by the requested user.

use crate::model::unit::Unit;
use crate::repo::blob_repo::{keys, BlobStore, RepoError};
use crate::service::snapshot::{decode, CorruptSnapshot};
use chrono::Utc;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub type UserId = Uuid;
pub type PlanId = Uuid;

/// Asserted account identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Normalized (trimmed, lowercase) email address.
    pub identifier: String,
}

/// Named snapshot of a whole unit collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub owner_id: UserId,
    pub name: String,
    pub units: Vec<Unit>,
    /// Epoch milliseconds of the last save.
    pub last_saved_at: i64,
}

/// Account and plan errors.
#[derive(Debug)]
pub enum AccountError {
    /// Identifier is blank or not email-shaped.
    InvalidIdentifier(String),
    /// Plan name is blank after trim.
    InvalidPlanName,
    PlanNotFound(PlanId),
    NotSignedIn,
    CorruptSnapshot(CorruptSnapshot),
    Encode(serde_json::Error),
    Repo(RepoError),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier(value) => {
                write!(f, "identifier must be an email address, got `{value}`")
            }
            Self::InvalidPlanName => write!(f, "plan name must not be blank"),
            Self::PlanNotFound(id) => write!(f, "plan not found: {id}"),
            Self::NotSignedIn => write!(f, "no user is signed in"),
            Self::CorruptSnapshot(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode account data: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CorruptSnapshot(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AccountError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<CorruptSnapshot> for AccountError {
    fn from(value: CorruptSnapshot) -> Self {
        Self::CorruptSnapshot(value)
    }
}

/// Identity and plan service facade.
pub struct AccountService<S: BlobStore> {
    store: S,
    now_ms: fn() -> i64,
}

impl<S: BlobStore> AccountService<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, || Utc::now().timestamp_millis())
    }

    /// Creates a service with a custom clock for `last_saved_at` stamps.
    pub fn with_clock(store: S, now_ms: fn() -> i64) -> Self {
        Self { store, now_ms }
    }

    /// Signs in with an email identifier and remembers the user.
    pub fn authenticate(&self, identifier: &str) -> Result<User, AccountError> {
        let normalized = normalize_identifier(identifier)?;
        let user = User {
            id: user_id_for(&normalized),
            identifier: normalized,
        };
        self.write_json(keys::USER, &user)?;
        info!("event=auth module=account status=ok user={}", user.id);
        Ok(user)
    }

    /// Remembered user, if any. A corrupt record reads as signed out.
    pub fn current_user(&self) -> Result<Option<User>, AccountError> {
        self.read_json_or_default(keys::USER)
    }

    /// Remembered user, or `NotSignedIn`.
    pub fn require_user(&self) -> Result<User, AccountError> {
        self.current_user()?.ok_or(AccountError::NotSignedIn)
    }

    /// Forgets the remembered user and the active plan marker.
    pub fn sign_out(&self) -> Result<(), AccountError> {
        self.store.delete(keys::USER)?;
        self.store.delete(keys::ACTIVE_PLAN)?;
        info!("event=sign_out module=account status=ok");
        Ok(())
    }

    /// Plans owned by `owner_id`, most recently saved first.
    pub fn list_plans(&self, owner_id: UserId) -> Result<Vec<Plan>, AccountError> {
        let mut plans: Vec<Plan> = self
            .load_all_plans()?
            .into_iter()
            .filter(|plan| plan.owner_id == owner_id)
            .collect();
        plans.sort_by(|a, b| {
            b.last_saved_at
                .cmp(&a.last_saved_at)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(plans)
    }

    /// Looks up one plan by id regardless of owner.
    pub fn get_plan(&self, id: PlanId) -> Result<Option<Plan>, AccountError> {
        Ok(self
            .load_all_plans()?
            .into_iter()
            .find(|plan| plan.id == id))
    }

    /// Creates and stores a new plan snapshot for `owner`.
    pub fn create_plan(
        &self,
        owner: &User,
        name: &str,
        units: Vec<Unit>,
    ) -> Result<Plan, AccountError> {
        let plan = Plan {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            name: name.to_string(),
            units,
            last_saved_at: 0,
        };
        self.save_plan(plan)
    }

    /// Upserts a plan by id and stamps `last_saved_at`.
    pub fn save_plan(&self, mut plan: Plan) -> Result<Plan, AccountError> {
        let name = plan.name.trim();
        if name.is_empty() {
            return Err(AccountError::InvalidPlanName);
        }
        plan.name = name.to_string();
        plan.last_saved_at = (self.now_ms)();

        let mut plans = self.load_all_plans()?;
        match plans.iter_mut().find(|existing| existing.id == plan.id) {
            Some(existing) => *existing = plan.clone(),
            None => plans.push(plan.clone()),
        }
        self.write_json(keys::PLANS, &plans)?;
        info!(
            "event=plan_save module=account status=ok plan={} units={}",
            plan.id,
            plan.units.len()
        );
        Ok(plan)
    }

    /// Deletes a plan; clears the active marker when it pointed at it.
    pub fn delete_plan(&self, id: PlanId) -> Result<(), AccountError> {
        let mut plans = self.load_all_plans()?;
        let before = plans.len();
        plans.retain(|plan| plan.id != id);
        if plans.len() == before {
            return Err(AccountError::PlanNotFound(id));
        }
        self.write_json(keys::PLANS, &plans)?;

        if self.active_plan_id()? == Some(id) {
            self.store.delete(keys::ACTIVE_PLAN)?;
        }
        info!("event=plan_delete module=account status=ok plan={id}");
        Ok(())
    }

    /// Plan the working board was last opened from or saved to.
    pub fn active_plan_id(&self) -> Result<Option<PlanId>, AccountError> {
        self.read_json_or_default(keys::ACTIVE_PLAN)
    }

    pub fn set_active_plan(&self, id: Option<PlanId>) -> Result<(), AccountError> {
        match id {
            Some(id) => self.write_json(keys::ACTIVE_PLAN, &id),
            None => {
                self.store.delete(keys::ACTIVE_PLAN)?;
                Ok(())
            }
        }
    }

    fn load_all_plans(&self) -> Result<Vec<Plan>, AccountError> {
        self.read_json_or_default(keys::PLANS)
    }

    fn read_json_or_default<T>(&self, key: &'static str) -> Result<T, AccountError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let Some(blob) = self.store.load(key)? else {
            return Ok(T::default());
        };
        match decode(key, &blob) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(
                    "event=snapshot_load module=account status=corrupt fallback=empty key={}",
                    err.key
                );
                Ok(T::default())
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AccountError> {
        let blob = serde_json::to_string(value).map_err(AccountError::Encode)?;
        self.store.save(key, &blob)?;
        Ok(())
    }
}

/// Trims and lowercases an email identifier, rejecting non-email input.
pub fn normalize_identifier(identifier: &str) -> Result<String, AccountError> {
    let normalized = identifier.trim().to_lowercase();
    if !EMAIL_RE.is_match(&normalized) {
        return Err(AccountError::InvalidIdentifier(identifier.trim().to_string()));
    }
    Ok(normalized)
}

fn user_id_for(normalized_identifier: &str) -> UserId {
    Uuid::new_v5(
        &Uuid::NAMESPACE_URL,
        format!("mailto:{normalized_identifier}").as_bytes(),
    )
}
