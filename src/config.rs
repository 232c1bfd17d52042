use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};

pub const DEFAULT_PROJECT_DIR: &str = "nextcloud-caddy";
pub const DEFAULT_ADMIN_USER: &str = "admin";

/// One Nextcloud tenant: a domain and the admin login created
/// for it.
///
/// Instances carry no identifier of their own. The ordinal used
/// in every generated name (`DOMAIN2`, `nginx2`, `backend2`, ...)
/// is the instance's position in [`Config::instances`] plus one.
///
/// # Example
///
/// ```
/// use nextcloud_caddy_gen::Instance;
///
/// let inst: Instance = "cloud.example.com:alice".parse().unwrap();
///
/// assert_eq!(inst.domain, "cloud.example.com");
/// assert_eq!(inst.admin_user, "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub domain: String,
    #[serde(default = "default_admin_user")]
    pub admin_user: String,
}

impl Instance {
    #[must_use]
    pub fn new(domain: &str, admin_user: &str) -> Self {
        Self {
            domain: domain.to_string(),
            admin_user: admin_user.to_string(),
        }
    }
}

/// Parses `DOMAIN` or `DOMAIN:ADMIN`. The admin user defaults to
/// `admin`.
impl FromStr for Instance {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (domain, admin_user) = match s.split_once(':') {
            Some((domain, admin_user)) => (domain.trim(), admin_user.trim()),
            None => (s.trim(), DEFAULT_ADMIN_USER),
        };

        if domain.is_empty() || admin_user.is_empty() {
            return Err(GenError::InvalidInstance(s.to_string()));
        }

        Ok(Self::new(domain, admin_user))
    }
}

/// Everything the script composer needs: where to deploy, who
/// receives ACME mail, and the ordered list of tenants.
///
/// # Example
///
/// ```
/// use nextcloud_caddy_gen::Config;
///
/// let config = Config::new("nc", "ops@example.com")
///     .instance("cloud.example.com", "admin")
///     .instance("files.example.com", "bob");
///
/// assert_eq!(config.instances.len(), 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_project_dir")]
    pub project_dir: String,
    pub acme_email: String,
    pub instances: Vec<Instance>,
}

impl Config {
    #[must_use]
    pub fn new(project_dir: &str, acme_email: &str) -> Self {
        Self {
            project_dir: project_dir.to_string(),
            acme_email: acme_email.to_string(),
            instances: Vec::new(),
        }
    }

    #[must_use]
    pub fn instance(mut self, domain: &str, admin_user: &str) -> Self {
        self.instances.push(Instance::new(domain, admin_user));
        self
    }

    /// Starter configuration written by `init`.
    #[must_use]
    pub fn starter() -> Self {
        Self::new(DEFAULT_PROJECT_DIR, "admin@example.com")
            .instance("cloud.example.com", DEFAULT_ADMIN_USER)
    }

    /// Load a configuration file. The format is picked from the
    /// extension: `.json`, `.yml` or `.yaml`.
    pub fn from_path(path: &Path) -> GenResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match ext.as_str() {
            "json" => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
            "yml" | "yaml" => Ok(serde_yaml::from_str(&fs::read_to_string(path)?)?),
            _ => Err(GenError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Serialize as YAML.
    pub fn to_yaml(&self) -> GenResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check the input contract the composer relies on.
    ///
    /// Every text field must be non-blank, at least one instance
    /// must exist, and no domain may appear twice. Shell
    /// metacharacters are left alone: the operator is trusted.
    pub fn validate(&self) -> GenResult<()> {
        if self.project_dir.trim().is_empty() {
            return Err(GenError::EmptyField("projectDir".into()));
        }
        if self.acme_email.trim().is_empty() {
            return Err(GenError::EmptyField("acmeEmail".into()));
        }
        if self.instances.is_empty() {
            return Err(GenError::NoInstances);
        }

        let mut seen = HashSet::new();
        for (i, inst) in self.instances.iter().enumerate() {
            if inst.domain.trim().is_empty() {
                return Err(GenError::EmptyField(format!("instances[{i}].domain")));
            }
            if inst.admin_user.trim().is_empty() {
                return Err(GenError::EmptyField(format!("instances[{i}].adminUser")));
            }
            if !seen.insert(inst.domain.as_str()) {
                return Err(GenError::DuplicateDomain(inst.domain.clone()));
            }
        }

        Ok(())
    }
}

fn default_project_dir() -> String {
    DEFAULT_PROJECT_DIR.to_string()
}

fn default_admin_user() -> String {
    DEFAULT_ADMIN_USER.to_string()
}
