//! The deployment script as a whole.
//!
//! [`compose`] fills the master template below with one fragment
//! per marker. The template is scanned exactly once and fragment
//! text is copied through untouched, so a `{{...}}` sequence in a
//! domain or user name is never treated as a marker.

use crate::compose::{self as compose_file};
use crate::config::Config;
use crate::{banner, caddyfile, credentials, env, manage, nginx, setup};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

const TEMPLATE: &str = r#"#!/bin/bash

# ============================================================================
# Nextcloud Multi-tenant Deployment with Caddy
# Generated by Nextcloud Docker Generator
# ============================================================================

set -e

# Color codes
RED='\033[0;31m'
GREEN='\033[0;32m'
YELLOW='\033[1;33m'
BLUE='\033[0;34m'
CYAN='\033[0;36m'
NC='\033[0m'

# Configuration
{{domain_vars}}
PROJECT_DIR="{{project_dir}}"

print_info() { echo -e "${BLUE}[INFO]${NC} $1"; }
print_success() { echo -e "${GREEN}[\u2713]${NC} $1"; }
print_warning() { echo -e "${YELLOW}[!]${NC} $1"; }
print_error() { echo -e "${RED}[\u2717]${NC} $1"; }

# Banner
clear
echo -e "${CYAN}============================================================================${NC}"
echo -e "${CYAN}     NEXTCLOUD WITH CADDY - DEPLOYMENT${NC}"
echo -e "${CYAN}============================================================================${NC}"
echo ""
echo "This script will deploy:"
{{banner}}
echo ""
echo "Features:"
echo "  \u2713 Automatic HTTPS with Caddy"
echo "  \u2713 Fixed nginx configuration for dashboard"
echo "  \u2713 Proper PHP-FPM handling"
echo "  \u2713 Production optimized"
echo ""
echo -e "${CYAN}============================================================================${NC}"
echo ""

# Check prerequisites
print_info "Checking prerequisites..."

if ! command -v docker &> /dev/null; then
    print_error "Docker is not installed"
    echo "Install with: curl -fsSL https://get.docker.com | sh"
    exit 1
fi

if ! docker ps >/dev/null 2>&1; then
    print_error "Cannot connect to Docker"
    echo "Add user to docker group: sudo usermod -aG docker $USER && newgrp docker"
    exit 1
fi

print_success "Prerequisites met"

# Check DNS
print_info "Checking DNS configuration..."
PUBLIC_IP=$(curl -s ifconfig.me)
print_info "Server IP: ${PUBLIC_IP}"

for domain in {{domain_list}}; do
    DOMAIN_IP=$(dig +short $domain | tail -n1)
    if [ "$DOMAIN_IP" = "$PUBLIC_IP" ]; then
        print_success "$domain \u2192 $DOMAIN_IP \u2713"
    else
        print_warning "$domain \u2192 $DOMAIN_IP (should be $PUBLIC_IP)"
    fi
done

# Set email
ACME_EMAIL="{{acme_email}}"

# Create directory structure
print_info "Creating directory structure..."
mkdir -p $PROJECT_DIR
cd $PROJECT_DIR
mkdir -p caddy/{data,config}
mkdir -p nginx
mkdir -p backups

# Generate secure passwords
print_info "Generating secure passwords..."
generate_password() {
    openssl rand -base64 32 | tr -d "=+/" | cut -c1-24
}

{{passwords}}

# Create .env file
print_info "Creating environment configuration..."
cat > .env << EOF
# Generated: $(date)
{{env_body}}
ACME_EMAIL=${ACME_EMAIL}
EOF
chmod 600 .env

# Create Caddyfile
print_info "Creating Caddyfile..."
cat > caddy/Caddyfile << EOF
{
    email ${ACME_EMAIL}
}

{{caddy_sites}}
EOF

# Create FIXED nginx configuration for FPM
print_info "Creating fixed nginx configurations..."

cat > nginx/nextcloud.conf.template << 'NGINX_TEMPLATE'
{{nginx_template}}
NGINX_TEMPLATE

{{nginx_configs}}

rm nginx/nextcloud.conf.template

print_success "Nginx configurations created"

# Create docker-compose.yml
print_info "Creating docker-compose.yml..."
cat > docker-compose.yml << 'COMPOSE'
services:
  caddy:
    image: caddy:alpine
    container_name: caddy
    restart: unless-stopped
    ports:
      - "80:80"
      - "443:443"
    volumes:
      - ./caddy/Caddyfile:/etc/caddy/Caddyfile:ro
      - ./caddy/data:/data
      - ./caddy/config:/config
    networks:
      - proxy-tier
    depends_on:
      - {{proxy_depends_on}}

{{services}}

volumes:
{{volumes}}

networks:
  proxy-tier:
{{networks}}
COMPOSE

print_success "docker-compose.yml created"

# Create networks
print_info "Creating Docker networks..."
docker network create proxy-tier 2>/dev/null || true
{{network_creation}}

# Deploy
print_info "Starting deployment..."
docker compose up -d

# Wait for services
print_info "Waiting for services to initialize (30 seconds)..."
sleep 30

# Fix any permission issues
print_info "Fixing permissions..."
{{permission_fixes}}

# Run initial setup commands
print_info "Running initial setup..."
{{initial_install}}

# Configure trusted domains and proxies
print_info "Configuring Nextcloud settings..."
{{trusted_domains}}

# Save credentials
print_info "Saving credentials..."
cat > credentials.txt << CREDS
============================================================================
                 NEXTCLOUD WITH CADDY - CREDENTIALS
============================================================================
Generated: $(date)

{{credentials}}

Database Passwords (for backups):
{{db_passwords}}

============================================================================
IMPORTANT: Save these credentials and delete this file!
============================================================================
CREDS
chmod 600 credentials.txt

# Check status
echo ""
print_info "Checking service status..."
SERVICES_OK=true
for service in {{status_services}}; do
    if docker ps | grep -q $service; then
        print_success "$service running"
    else
        print_error "$service not running"
        SERVICES_OK=false
    fi
done

# Create management script
print_info "Creating management script..."
cat > manage.sh << 'MANAGE'
#!/bin/bash
case "$1" in
    logs)
        docker compose logs -f ${2}
        ;;
    restart)
        docker compose restart ${2}
        ;;
    status)
        docker compose ps
        ;;
    fix-permissions)
{{manage_fix_permissions}}
        ;;
{{occ_commands}}
    *)
        echo "Usage: $0 {logs|restart|status|fix-permissions|{{manage_usage}}} [args]"
        ;;
esac
MANAGE
chmod +x manage.sh

# Final output
echo ""
echo -e "${GREEN}============================================================================${NC}"
if [ "$SERVICES_OK" = true ]; then
    echo -e "${GREEN}           DEPLOYMENT COMPLETE!${NC}"
else
    echo -e "${YELLOW}           DEPLOYMENT COMPLETE WITH WARNINGS${NC}"
fi
echo -e "${GREEN}============================================================================${NC}"
echo ""
echo "Caddy will automatically obtain SSL certificates on first access!"
echo ""
echo "Access your Nextcloud instances:"
{{final_urls}}
echo ""
echo -e "${YELLOW}Credentials saved to: credentials.txt${NC}"
echo -e "${RED}Delete credentials.txt after saving passwords!${NC}"
echo ""
echo "Management commands:"
echo "  ./manage.sh status              - Check status"
echo "  ./manage.sh logs [service]      - View logs"
echo "  ./manage.sh restart [service]   - Restart service"
echo "  ./manage.sh fix-permissions     - Fix file permissions"
{{occ_help}}
echo ""
echo "If you get 403 errors, run:"
echo "  ./manage.sh fix-permissions"
echo "  ./manage.sh restart"
echo ""
echo -e "${GREEN}============================================================================${NC}"
"#;

/// Render the complete deployment script for `config`.
///
/// Pure and deterministic: the same configuration always yields
/// the same bytes. Inputs are not validated or shell-escaped; see
/// [`Config::validate`] for the contract callers are expected to
/// check first.
///
/// # Example
///
/// ```
/// use nextcloud_caddy_gen::{Config, compose};
///
/// let config = Config::new("nc", "a@b.com").instance("cloud.x.com", "admin");
/// let script = compose(&config);
///
/// assert!(script.starts_with("#!/bin/bash\n"));
/// assert!(script.contains("DOMAIN1=\"cloud.x.com\"\n"));
/// assert!(script.contains("PROJECT_DIR=\"nc\"\n"));
/// ```
#[must_use]
pub fn compose(config: &Config) -> String {
    let instances = config.instances.as_slice();

    let fragments = [
        ("domain_vars", env::domain_vars(instances)),
        ("project_dir", config.project_dir.clone()),
        ("banner", banner::banner_lines(instances)),
        ("domain_list", env::domain_list(instances)),
        ("acme_email", config.acme_email.clone()),
        ("passwords", env::password_declarations(instances)),
        ("env_body", env::env_body(instances)),
        ("caddy_sites", caddyfile::render(instances)),
        ("nginx_template", nginx::TEMPLATE.to_string()),
        ("nginx_configs", nginx::config_commands(instances)),
        ("proxy_depends_on", compose_file::proxy_depends_on(instances)),
        ("services", compose_file::services(instances)),
        ("volumes", compose_file::volumes(instances)),
        ("networks", compose_file::networks(instances)),
        ("network_creation", setup::network_creation(instances)),
        ("permission_fixes", setup::permission_fixes(instances)),
        ("initial_install", setup::initial_install(instances)),
        ("trusted_domains", setup::trusted_domain_config(instances)),
        ("credentials", credentials::report(instances)),
        ("db_passwords", credentials::db_passwords(instances)),
        ("status_services", setup::service_status_list(instances)),
        ("manage_fix_permissions", manage::permission_fixes(instances)),
        ("occ_commands", manage::occ_commands(instances)),
        ("manage_usage", manage::usage(instances)),
        ("final_urls", banner::final_urls(instances)),
        ("occ_help", manage::help_lines(instances)),
    ];

    fill(TEMPLATE, &fragments)
}

/// Replace every `{{name}}` marker in `template` in one left to
/// right pass. Unknown markers are kept verbatim.
fn fill(template: &str, fragments: &[(&str, String)]) -> String {
    let extra: usize = fragments.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];

        let Some(end) = after.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        if let Some((_, value)) = fragments.iter().find(|(key, _)| *key == name) {
            out.push_str(value);
        } else {
            out.push_str(OPEN);
            out.push_str(name);
            out.push_str(CLOSE);
        }
        rest = &after[end + CLOSE.len()..];
    }

    out.push_str(rest);
    out
}
