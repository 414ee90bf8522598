// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provisioning status reported by the load-balancer control plane

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Provisioning status of a load balancer or one of its children.
///
/// `Deleted` is never reported by the API; it only exists as a wait target.
/// An empty or unrecognised label is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProvisioningStatus {
    PendingCreate,
    PendingUpdate,
    PendingDelete,
    Active,
    Error,
    Deleted,
    Other(String),
}

impl Default for ProvisioningStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl ProvisioningStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::PendingCreate => "PENDING_CREATE",
            Self::PendingUpdate => "PENDING_UPDATE",
            Self::PendingDelete => "PENDING_DELETE",
            Self::Active => "ACTIVE",
            Self::Error => "ERROR",
            Self::Deleted => "DELETED",
            Self::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "PENDING_CREATE" => Self::PendingCreate,
            "PENDING_UPDATE" => Self::PendingUpdate,
            "PENDING_DELETE" => Self::PendingDelete,
            "ACTIVE" => Self::Active,
            "ERROR" => Self::Error,
            "DELETED" => Self::Deleted,
            _ => Self::Other(s.to_string()),
        }
    }

    /// `ACTIVE` or `ERROR`: the backend has finished working on the object.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Active | Self::Error)
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::PendingCreate | Self::PendingUpdate | Self::PendingDelete
        )
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Other(s) if s.is_empty())
    }
}

impl From<String> for ProvisioningStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<ProvisioningStatus> for String {
    fn from(status: ProvisioningStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ProvisioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "<empty>")
        } else {
            write!(f, "{}", self.as_str())
        }
    }
}

impl std::str::FromStr for ProvisioningStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Statuses that keep a create or update wait polling.
pub fn pending_statuses() -> Vec<ProvisioningStatus> {
    vec![
        ProvisioningStatus::PendingCreate,
        ProvisioningStatus::PendingUpdate,
    ]
}

/// Statuses that keep a delete wait polling until the object disappears.
pub fn pending_delete_statuses() -> Vec<ProvisioningStatus> {
    vec![
        ProvisioningStatus::Active,
        ProvisioningStatus::PendingUpdate,
        ProvisioningStatus::PendingDelete,
        ProvisioningStatus::Error,
    ]
}

/// Treats JSON `null` the same as a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
