use crate::config::Instance;

/// Shared reverse proxy service and container. Not numbered.
pub const PROXY_SERVICE: &str = "caddy";

/// External network joining the proxy to every web tier.
pub const PROXY_NETWORK: &str = "proxy-tier";

#[must_use]
pub fn app_container(n: usize) -> String {
    format!("nextcloud{n}-app")
}

#[must_use]
pub fn web_container(n: usize) -> String {
    format!("nginx{n}")
}

#[must_use]
pub fn db_container(n: usize) -> String {
    format!("nextcloud{n}-db")
}

#[must_use]
pub fn redis_container(n: usize) -> String {
    format!("nextcloud{n}-redis")
}

#[must_use]
pub fn backend_network(n: usize) -> String {
    format!("backend{n}")
}

/// Render one piece of text per instance and join them with
/// `sep`.
///
/// The closure receives the 1-based ordinal and the instance.
/// Instances are visited in list order; nothing is sorted.
///
/// ```
/// use nextcloud_caddy_gen::Instance;
/// use nextcloud_caddy_gen::fragment::per_instance;
///
/// let instances = [
///     Instance::new("a.dev", "admin"),
///     Instance::new("b.dev", "admin"),
/// ];
///
/// let out = per_instance(&instances, ",", |n, inst| format!("{n}={}", inst.domain));
/// assert_eq!(out, "1=a.dev,2=b.dev");
/// ```
pub fn per_instance<F>(instances: &[Instance], sep: &str, mut render: F) -> String
where
    F: FnMut(usize, &Instance) -> String,
{
    instances
        .iter()
        .enumerate()
        .map(|(i, inst)| render(i + 1, inst))
        .collect::<Vec<_>>()
        .join(sep)
}
