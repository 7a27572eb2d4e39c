/// Account roles offered on the role-selection screen.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Driver,
    Company,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Driver => "driver",
            Role::Company => "company",
            Role::Admin => "admin",
        }
    }

    /// Display form used in screen titles ("Create your Driver Account").
    pub fn title_case(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Driver => "Driver",
            Role::Company => "Company",
            Role::Admin => "Admin",
        }
    }

    /// Post-login landing page for this role. Companies get their own
    /// dashboard; everyone else lands on the rider dashboard.
    pub fn dashboard(&self) -> &'static str {
        match self {
            Role::Company => "companyDashboard",
            _ => "dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "driver" => Ok(Role::Driver),
            "company" => Ok(Role::Company),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}
