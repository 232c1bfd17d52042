//! `docker-compose.yml` fragments.
//!
//! Each instance gets five services on its own internal
//! `backend{N}` network. Only the app and web tiers also join the
//! shared proxy network. The compose heredoc is quoted, so the
//! `${...}` references are resolved by Docker Compose from `.env`.

use crate::config::Instance;
use crate::fragment::{PROXY_NETWORK, per_instance, web_container};

/// Service stanzas for every instance, separated by a blank line.
#[must_use]
pub fn services(instances: &[Instance]) -> String {
    per_instance(instances, "\n\n", |n, inst| {
        [
            app_service(n, &inst.domain),
            web_service(n),
            cron_service(n),
            db_service(n),
            redis_service(n),
        ]
        .join("\n\n")
    })
}

/// Entries of the proxy's `depends_on` list. The first `- ` is
/// part of the surrounding template.
#[must_use]
pub fn proxy_depends_on(instances: &[Instance]) -> String {
    per_instance(instances, "\n      - ", |n, _| web_container(n))
}

/// Top-level named volumes: app files, database data, Redis data.
#[must_use]
pub fn volumes(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| {
        format!("  nc{n}_html:\n  db{n}_data:\n  redis{n}_data:")
    })
}

/// Top-level internal networks, listed after the proxy network.
#[must_use]
pub fn networks(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| {
        format!("  backend{n}:\n    internal: true")
    })
}

fn app_service(n: usize, domain: &str) -> String {
    format!(
        r"  # Nextcloud Instance {n} - {domain}
  nextcloud{n}:
    image: nextcloud:fpm-alpine
    container_name: nextcloud{n}-app
    restart: unless-stopped
    environment:
      - POSTGRES_HOST=db{n}
      - POSTGRES_DB=nextcloud{n}
      - POSTGRES_USER=nextcloud{n}
      - POSTGRES_PASSWORD=${{DB{n}_PASSWORD}}
      - REDIS_HOST=redis{n}
      - REDIS_HOST_PASSWORD=${{REDIS{n}_PASSWORD}}
      - NEXTCLOUD_ADMIN_USER=${{NC{n}_ADMIN_USER}}
      - NEXTCLOUD_ADMIN_PASSWORD=${{NC{n}_ADMIN_PASSWORD}}
      - NEXTCLOUD_TRUSTED_DOMAINS={domain}
      - OVERWRITEPROTOCOL=https
      - OVERWRITEHOST={domain}
      - TRUSTED_PROXIES=caddy nginx{n}
      - PHP_MEMORY_LIMIT=1G
      - PHP_UPLOAD_LIMIT=10G
    volumes:
      - nc{n}_html:/var/www/html
    networks:
      - backend{n}
      - {PROXY_NETWORK}
    depends_on:
      - db{n}
      - redis{n}"
    )
}

fn web_service(n: usize) -> String {
    format!(
        r"  nginx{n}:
    image: nginx:alpine
    container_name: nginx{n}
    restart: unless-stopped
    volumes:
      - ./nginx/nginx{n}.conf:/etc/nginx/nginx.conf:ro
      - nc{n}_html:/var/www/html:ro
    networks:
      - backend{n}
      - {PROXY_NETWORK}
    depends_on:
      - nextcloud{n}"
    )
}

fn cron_service(n: usize) -> String {
    format!(
        r"  nextcloud{n}-cron:
    image: nextcloud:fpm-alpine
    container_name: nextcloud{n}-cron
    restart: unless-stopped
    entrypoint: /cron.sh
    volumes:
      - nc{n}_html:/var/www/html
    networks:
      - backend{n}
    depends_on:
      - db{n}
      - redis{n}"
    )
}

fn db_service(n: usize) -> String {
    format!(
        r"  db{n}:
    image: postgres:15-alpine
    container_name: nextcloud{n}-db
    restart: unless-stopped
    environment:
      POSTGRES_DB: nextcloud{n}
      POSTGRES_USER: nextcloud{n}
      POSTGRES_PASSWORD: ${{DB{n}_PASSWORD}}
    volumes:
      - db{n}_data:/var/lib/postgresql/data
    networks:
      - backend{n}"
    )
}

fn redis_service(n: usize) -> String {
    format!(
        r"  redis{n}:
    image: redis:7-alpine
    container_name: nextcloud{n}-redis
    restart: unless-stopped
    command: redis-server --requirepass ${{REDIS{n}_PASSWORD}}
    volumes:
      - redis{n}_data:/data
    networks:
      - backend{n}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two() -> Vec<Instance> {
        vec![
            Instance::new("one.dev", "admin"),
            Instance::new("two.dev", "admin"),
        ]
    }

    #[test]
    fn five_services_per_instance() {
        let out = services(&two());

        for n in 1..=2 {
            assert!(out.contains(&format!("  nextcloud{n}:\n")));
            assert!(out.contains(&format!("  nginx{n}:\n")));
            assert!(out.contains(&format!("  nextcloud{n}-cron:\n")));
            assert!(out.contains(&format!("  db{n}:\n")));
            assert!(out.contains(&format!("  redis{n}:\n")));
        }
        assert_eq!(out.matches("container_name:").count(), 10);
    }

    #[test]
    fn domain_feeds_trusted_and_overwrite_host() {
        let out = services(&two());

        assert!(out.contains("  # Nextcloud Instance 2 - two.dev\n"));
        assert!(out.contains("NEXTCLOUD_TRUSTED_DOMAINS=two.dev\n"));
        assert!(out.contains("OVERWRITEHOST=one.dev\n"));
    }

    #[test]
    fn only_app_and_web_join_proxy_network() {
        let out = services(&[Instance::new("x.dev", "admin")]);

        assert_eq!(out.matches("- proxy-tier").count(), 2);
    }

    #[test]
    fn quintet_ends_without_trailing_newline() {
        let out = services(&[Instance::new("x.dev", "admin")]);

        assert!(out.ends_with("      - backend1"));
    }

    #[test]
    fn depends_on_continuation() {
        assert_eq!(proxy_depends_on(&two()), "nginx1\n      - nginx2");
    }

    #[test]
    fn volume_and_network_declarations() {
        let instances = two();

        assert_eq!(
            volumes(&instances),
            "  nc1_html:\n  db1_data:\n  redis1_data:\n  nc2_html:\n  db2_data:\n  redis2_data:"
        );
        assert_eq!(
            networks(&instances),
            "  backend1:\n    internal: true\n  backend2:\n    internal: true"
        );
    }
}
