//! Post-start commands run by the deployment script.
//!
//! Every per-instance command ends in [`TOLERATE_FAILURE`] so a
//! re-run against an already configured host keeps going.

use crate::config::Instance;
use crate::fragment::{
    PROXY_SERVICE, app_container, backend_network, db_container, per_instance, redis_container,
    web_container,
};

/// Suffix that silences stderr and swallows a non-zero exit.
pub const TOLERATE_FAILURE: &str = " 2>/dev/null || true";

/// `php occ` inside an instance's app container, as `www-data`.
#[must_use]
pub fn occ(n: usize, args: &str) -> String {
    format!("docker exec -u www-data {} php occ {args}", app_container(n))
}

/// `chown` of the web root inside an instance's app container.
#[must_use]
pub fn chown_web_root(n: usize) -> String {
    format!(
        "docker exec {} chown -R www-data:www-data /var/www/html",
        app_container(n)
    )
}

#[must_use]
pub fn network_creation(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| {
        format!("docker network create {}{TOLERATE_FAILURE}", backend_network(n))
    })
}

#[must_use]
pub fn permission_fixes(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| {
        format!("{}{TOLERATE_FAILURE}", chown_web_root(n))
    })
}

/// `maintenance:install` per instance.
///
/// The login passed here is always `admin`. The instance's own
/// admin user reaches Nextcloud through `NEXTCLOUD_ADMIN_USER`.
#[must_use]
pub fn initial_install(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| {
        let args = format!(
            "maintenance:install --admin-user admin --admin-pass \"${{NC{n}_ADMIN_PASSWORD}}\""
        );
        format!("{}{TOLERATE_FAILURE}", occ(n, &args))
    })
}

/// Trusted domain, proxy and overwrite settings. One block of
/// five commands per instance, blocks separated by a blank line.
#[must_use]
pub fn trusted_domain_config(instances: &[Instance]) -> String {
    per_instance(instances, "\n\n", |n, inst| {
        let settings = [
            format!("trusted_domains 0 --value=\"{}\"", inst.domain),
            format!("trusted_proxies 0 --value=\"{PROXY_SERVICE}\""),
            format!("trusted_proxies 1 --value=\"{}\"", web_container(n)),
            format!("overwrite.cli.url --value=\"https://{}\"", inst.domain),
            "overwriteprotocol --value=\"https\"".to_string(),
        ];

        settings
            .iter()
            .map(|s| format!("{}{TOLERATE_FAILURE}", occ(n, &format!("config:system:set {s}"))))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// Containers probed after start-up: the proxy once, then web,
/// app, database and cache for each instance.
#[must_use]
pub fn service_status_list(instances: &[Instance]) -> String {
    let mut names = vec![PROXY_SERVICE.to_string()];
    for n in 1..=instances.len() {
        names.extend([
            web_container(n),
            app_container(n),
            db_container(n),
            redis_container(n),
        ]);
    }
    names.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two() -> Vec<Instance> {
        vec![
            Instance::new("one.dev", "alice"),
            Instance::new("two.dev", "bob"),
        ]
    }

    #[test]
    fn every_command_tolerates_failure() {
        let instances = two();

        for fragment in [
            network_creation(&instances),
            permission_fixes(&instances),
            initial_install(&instances),
            trusted_domain_config(&instances),
        ] {
            for line in fragment.lines().filter(|l| !l.is_empty()) {
                assert!(line.ends_with(TOLERATE_FAILURE), "{line}");
            }
        }
    }

    #[test]
    fn network_per_instance() {
        assert_eq!(
            network_creation(&two()),
            "docker network create backend1 2>/dev/null || true\n\
             docker network create backend2 2>/dev/null || true"
        );
    }

    #[test]
    fn install_uses_fixed_admin_login() {
        let out = initial_install(&two());

        assert_eq!(out.matches("--admin-user admin ").count(), 2);
        assert!(!out.contains("alice"));
        assert!(out.contains("--admin-pass \"${NC2_ADMIN_PASSWORD}\""));
    }

    #[test]
    fn trusted_domain_blocks() {
        let out = trusted_domain_config(&two());
        let blocks: Vec<&str> = out.split("\n\n").collect();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines().count(), 5);
        assert!(blocks[0].contains(
            "docker exec -u www-data nextcloud1-app php occ config:system:set \
             trusted_domains 0 --value=\"one.dev\" 2>/dev/null || true"
        ));
        assert!(blocks[1].contains("trusted_proxies 1 --value=\"nginx2\""));
        assert!(blocks[1].contains("overwrite.cli.url --value=\"https://two.dev\""));
        assert!(!blocks[1].contains("nextcloud1-app"));
    }

    #[test]
    fn status_list_for_two_instances() {
        assert_eq!(
            service_status_list(&two()),
            "caddy nginx1 nextcloud1-app nextcloud1-db nextcloud1-redis \
             nginx2 nextcloud2-app nextcloud2-db nextcloud2-redis"
        );
    }
}
