use crate::config::Instance;
use crate::fragment::per_instance;

/// Login details per instance for `credentials.txt`.
#[must_use]
pub fn report(instances: &[Instance]) -> String {
    per_instance(instances, "\n\n", |n, inst| {
        format!(
            "${{DOMAIN{n}}}\n\
             --------------------------\n\
             URL: https://${{DOMAIN{n}}}\n\
             Admin User: {}\n\
             Admin Password: ${{NC{n}_ADMIN_PASSWORD}}",
            inst.admin_user
        )
    })
}

/// Database passwords, kept for backups.
#[must_use]
pub fn db_passwords(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| format!("DB{n}: ${{DB{n}_PASSWORD}}"))
}
