use crate::config::Instance;
use crate::fragment::per_instance;

/// Opening announcement, one bullet per instance.
#[must_use]
pub fn banner_lines(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| {
        format!("echo \"  \u{2022} ${{GREEN}}${{DOMAIN{n}}}${{NC}} - Nextcloud Instance {n}\"")
    })
}

/// Closing list of HTTPS URLs. The lock emoji is written as
/// escaped bytes for `echo -e`.
#[must_use]
pub fn final_urls(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| {
        format!(r#"echo -e "  \xf0\x9f\x94\x92 ${{GREEN}}https://${{DOMAIN{n}}}${{NC}}""#)
    })
}
