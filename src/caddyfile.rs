use crate::config::Instance;
use crate::fragment::{per_instance, web_container};

/// Response headers set on every site. A leading `-` removes the
/// header instead.
pub const SECURITY_HEADERS: &[&str] = &[
    r#"Strict-Transport-Security "max-age=31536000; includeSubDomains; preload""#,
    r#"X-Content-Type-Options "nosniff""#,
    r#"X-Frame-Options "SAMEORIGIN""#,
    r#"X-XSS-Protection "1; mode=block""#,
    r#"X-Robots-Tag "noindex, nofollow""#,
    "-X-Powered-By",
];

/// Render the site blocks of the Caddyfile, separated by a blank
/// line.
///
/// Sites are addressed by `${DOMAIN{N}}` and expanded by the shell
/// when the heredoc is written.
#[must_use]
pub fn render(instances: &[Instance]) -> String {
    per_instance(instances, "\n\n", |n, _| site_block(n))
}

fn site_block(n: usize) -> String {
    let headers = SECURITY_HEADERS.iter().fold(String::new(), |mut acc, h| {
        acc.push_str("        ");
        acc.push_str(h);
        acc.push('\n');
        acc
    });

    format!(
        "${{DOMAIN{n}}} {{\n    reverse_proxy {}:80\n\n    header {{\n{headers}    }}\n}}",
        web_container(n)
    )
}
