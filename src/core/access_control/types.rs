//! Access control type definitions

use super::ids::{principal_id, role_id};
use crate::utils::error::ConsoleError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Principal name of the identity the server creates for local clients
pub const LOCAL_USERNAME: &str = "$local";

/// Standard role names
pub const SUPER_USER: &str = "SuperUser";
pub const ADMINISTRATOR: &str = "Administrator";

/// Which access control provider the server uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessControlProvider {
    #[default]
    Simple,
    Rbac,
}

impl AccessControlProvider {
    /// Value of the `provider` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Rbac => "rbac",
        }
    }

    /// The provider a switch moves to
    pub fn toggled(self) -> Self {
        match self {
            Self::Simple => Self::Rbac,
            Self::Rbac => Self::Simple,
        }
    }
}

impl fmt::Display for AccessControlProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessControlProvider {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "rbac" => Ok(Self::Rbac),
            _ => Err(ConsoleError::parsing(format!("Unknown access control provider: {}", s))),
        }
    }
}

/// Kind of principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrincipalType {
    User,
    Group,
}

impl PrincipalType {
    /// Value of the `type` attribute of an include or exclude
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Group => "GROUP",
        }
    }

    /// Prefix of ids and new resource names
    pub fn prefix(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

impl FromStr for PrincipalType {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "GROUP" => Ok(Self::Group),
            _ => Err(ConsoleError::parsing(format!("Unknown principal type: {}", s))),
        }
    }
}

/// A user or group referenced by assignments
///
/// Two principals are equal when their resource names are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    principal_type: PrincipalType,
    resource_name: String,
    name: String,
    realm: Option<String>,
}

impl Principal {
    pub fn new(
        principal_type: PrincipalType,
        resource_name: impl Into<String>,
        name: impl Into<String>,
        realm: Option<String>,
    ) -> Self {
        Self {
            principal_type,
            resource_name: resource_name.into(),
            name: name.into(),
            realm,
        }
    }

    /// A principal that does not exist yet, named `user-<name>[@realm]`
    pub fn transient(principal_type: PrincipalType, name: &str, realm: Option<&str>) -> Self {
        let mut resource_name = format!("{}-{}", principal_type.prefix(), name);
        if let Some(realm) = realm.filter(|realm| !realm.is_empty()) {
            resource_name.push('@');
            resource_name.push_str(realm);
        }
        Self::new(
            principal_type,
            resource_name,
            name,
            realm.filter(|realm| !realm.is_empty()).map(str::to_string),
        )
    }

    pub fn id(&self) -> String {
        principal_id(self.principal_type.prefix(), &self.name)
    }

    pub fn principal_type(&self) -> PrincipalType {
        self.principal_type
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }
}

impl PartialEq for Principal {
    fn eq(&self, other: &Self) -> bool {
        self.resource_name == other.resource_name
    }
}

impl Eq for Principal {}

impl Hash for Principal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource_name.hash(state);
    }
}

impl PartialOrd for Principal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Principal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.resource_name.cmp(&other.resource_name)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.realm {
            Some(realm) => write!(f, "{}({}@{})", self.principal_type.prefix(), self.name, realm),
            None => write!(f, "{}({})", self.principal_type.prefix(), self.name),
        }
    }
}

/// Kind of role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleType {
    Standard,
    Host,
    ServerGroup,
}

impl RoleType {
    /// Child type of the scoped role resource; `None` for standard roles
    pub fn resource_type(self) -> Option<&'static str> {
        match self {
            Self::Standard => None,
            Self::Host => Some("host-scoped-role"),
            Self::ServerGroup => Some("server-group-scoped-role"),
        }
    }

    /// Label used in notifications
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Role",
            Self::Host => "Host Scoped Role",
            Self::ServerGroup => "Server Group Scoped Role",
        }
    }

    /// Attribute holding the scope of a scoped role
    pub fn scope_attribute(self) -> Option<&'static str> {
        match self {
            Self::Standard => None,
            Self::Host => Some("hosts"),
            Self::ServerGroup => Some("server-groups"),
        }
    }
}

/// An authorization role
///
/// Equality is by name only. Scoped roles reference their base role by name;
/// resolve it through the role registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    name: String,
    role_type: RoleType,
    base_role: Option<String>,
    scope: BTreeSet<String>,
    include_all: bool,
}

impl Role {
    pub fn standard(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role_type: RoleType::Standard,
            base_role: None,
            scope: BTreeSet::new(),
            include_all: false,
        }
    }

    pub fn scoped<I, S>(
        name: impl Into<String>,
        role_type: RoleType,
        base_role: Option<String>,
        scope: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            role_type,
            base_role,
            scope: scope.into_iter().map(Into::into).collect(),
            include_all: false,
        }
    }

    pub fn id(&self) -> String {
        role_id(&self.name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role_type(&self) -> RoleType {
        self.role_type
    }

    pub fn is_standard(&self) -> bool {
        self.role_type == RoleType::Standard
    }

    pub fn is_scoped(&self) -> bool {
        !self.is_standard()
    }

    /// Name of the standard role a scoped role derives from
    pub fn base_role(&self) -> Option<&str> {
        self.base_role.as_deref()
    }

    pub fn scope(&self) -> &BTreeSet<String> {
        &self.scope
    }

    pub fn is_include_all(&self) -> bool {
        self.include_all
    }

    pub(crate) fn set_include_all(&mut self, include_all: bool) {
        self.include_all = include_all;
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Inclusion or exclusion of a principal in a role
///
/// Equal when principal, role name and direction are equal, so one principal
/// can be included in and excluded from the same role at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    principal: Principal,
    role: String,
    include: bool,
}

impl Assignment {
    pub fn new(principal: Principal, role: &Role, include: bool) -> Self {
        Self {
            principal,
            role: role.name().to_string(),
            include,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Name of the role
    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn role_id(&self) -> String {
        role_id(&self.role)
    }

    pub fn is_include(&self) -> bool {
        self.include
    }

    /// Child type under the role mapping (`include` or `exclude`)
    pub fn direction(&self) -> &'static str {
        if self.include { "include" } else { "exclude" }
    }
}

impl PartialOrd for Assignment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Assignment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.principal
            .cmp(&other.principal)
            .then_with(|| self.role.cmp(&other.role))
            .then_with(|| self.include.cmp(&other.include))
    }
}
