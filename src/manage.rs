//! The `manage.sh` helper written next to the compose file.
//!
//! Fixed subcommands (`logs`, `restart`, `status`,
//! `fix-permissions`) live in the master template. This module
//! renders the parts that grow with the instance list.

use crate::config::Instance;
use crate::fragment::per_instance;
use crate::setup::{chown_web_root, occ};

/// Name of the subcommand proxying to an instance's `occ`.
#[must_use]
pub fn subcommand(n: usize) -> String {
    format!("occ{n}")
}

/// `occ{N})` case arms forwarding the remaining arguments.
#[must_use]
pub fn occ_commands(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| {
        format!(
            "    {})\n        {}\n        ;;",
            subcommand(n),
            occ(n, "${@:2}")
        )
    })
}

/// Body of the `fix-permissions` arm. Failures are not
/// suppressed here: the operator runs it by hand.
#[must_use]
pub fn permission_fixes(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| format!("        {}", chown_web_root(n)))
}

/// `occ1|occ2|...` for the usage message.
#[must_use]
pub fn usage(instances: &[Instance]) -> String {
    per_instance(instances, "|", |n, _| subcommand(n))
}

/// Help lines printed at the end of the deployment.
#[must_use]
pub fn help_lines(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| {
        format!(
            "echo \"  ./manage.sh {} [command]      - Run occ on instance {n}\"",
            subcommand(n)
        )
    })
}
