//! Shell variables and the `.env` file.
//!
//! Secrets are never produced here. The script declares them
//! with `$(generate_password)` and they are filled in when the
//! operator runs it.

use crate::config::Instance;
use crate::fragment::per_instance;

/// `DOMAIN{N}="{domain}"`, one line per instance.
#[must_use]
pub fn domain_vars(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, inst| {
        format!("DOMAIN{n}=\"{}\"", inst.domain)
    })
}

/// Space-separated `$DOMAIN{N}` tokens for the DNS check loop.
#[must_use]
pub fn domain_list(instances: &[Instance]) -> String {
    per_instance(instances, " ", |n, _| format!("$DOMAIN{n}"))
}

/// Database, Redis and admin password assignments.
#[must_use]
pub fn password_declarations(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| {
        format!(
            "DB{n}_PASSWORD=$(generate_password)\n\
             REDIS{n}_PASSWORD=$(generate_password)\n\
             NC{n}_ADMIN_PASSWORD=$(generate_password)"
        )
    })
}

/// Per-instance lines of the `.env` heredoc. The heredoc is
/// unquoted, so the `${...}` references expand when the script
/// runs.
#[must_use]
pub fn env_body(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, inst| {
        format!(
            "DB{n}_PASSWORD=${{DB{n}_PASSWORD}}\n\
             REDIS{n}_PASSWORD=${{REDIS{n}_PASSWORD}}\n\
             NC{n}_ADMIN_USER={}\n\
             NC{n}_ADMIN_PASSWORD=${{NC{n}_ADMIN_PASSWORD}}",
            inst.admin_user
        )
    })
}
