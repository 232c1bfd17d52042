//! Web-tier configuration.
//!
//! The script writes one shared nginx template, derives a config
//! per instance by substituting the FPM upstream, then deletes the
//! template.

use crate::config::Instance;
use crate::fragment::{app_container, per_instance, web_container};

/// Upstream host placeholder replaced per instance.
pub const APP_PLACEHOLDER: &str = "NEXTCLOUD_APP";

/// Path of the shared template on the deployment host.
pub const TEMPLATE_PATH: &str = "nginx/nextcloud.conf.template";

/// nginx configuration for a Nextcloud PHP-FPM backend. Written
/// through a quoted heredoc, so `$` is literal.
pub const TEMPLATE: &str = r#"user nginx;
worker_processes auto;

events {
    worker_connections 2048;
    use epoll;
    multi_accept on;
}

http {
    include /etc/nginx/mime.types;
    default_type application/octet-stream;

    sendfile on;
    tcp_nopush on;
    tcp_nodelay on;
    keepalive_timeout 65;
    types_hash_max_size 2048;
    server_tokens off;

    client_max_body_size 10G;
    client_body_buffer_size 512k;
    client_body_timeout 300s;
    fastcgi_buffers 64 4K;

    gzip on;
    gzip_vary on;
    gzip_comp_level 4;
    gzip_min_length 256;
    gzip_types text/css text/javascript text/xml text/plain application/javascript application/json application/xml;

    upstream php-handler {
        server NEXTCLOUD_APP:9000;
    }

    server {
        listen 80;
        server_name _;

        root /var/www/html;

        add_header X-Content-Type-Options nosniff always;
        add_header X-Frame-Options "SAMEORIGIN" always;
        add_header X-Robots-Tag "noindex, nofollow" always;
        add_header X-Download-Options noopen always;
        add_header X-Permitted-Cross-Domain-Policies none always;
        add_header Referrer-Policy no-referrer always;
        add_header X-XSS-Protection "1; mode=block" always;

        fastcgi_hide_header X-Powered-By;

        client_max_body_size 10G;
        client_body_timeout 300s;
        fastcgi_buffers 64 4K;

        gzip on;
        gzip_vary on;
        gzip_comp_level 4;
        gzip_min_length 256;

        client_body_buffer_size 512k;

        add_header Referrer-Policy                   "no-referrer"       always;
        add_header X-Content-Type-Options            "nosniff"           always;
        add_header X-Frame-Options                   "SAMEORIGIN"        always;
        add_header X-Permitted-Cross-Domain-Policies "none"              always;
        add_header X-Robots-Tag                      "noindex, nofollow" always;
        add_header X-XSS-Protection                  "1; mode=block"     always;

        root /var/www/html;

        index index.php index.html /index.php$request_uri;

        location = / {
            if ( $http_user_agent ~ ^DavClnt ) {
                return 302 /remote.php/webdav/$is_args$args;
            }
        }

        location = /robots.txt {
            allow all;
            log_not_found off;
            access_log off;
        }

        location ^~ /.well-known {
            location = /.well-known/carddav   { return 301 /remote.php/dav/; }
            location = /.well-known/caldav    { return 301 /remote.php/dav/; }
            location /.well-known/acme-challenge    { try_files $uri $uri/ =404; }
            location /.well-known/pki-validation    { try_files $uri $uri/ =404; }
            return 301 /index.php$request_uri;
        }

        location ~ ^/(?:build|tests|config|lib|3rdparty|templates|data)(?:$|/)  { return 404; }
        location ~ ^/(?:\.|autotest|occ|issue|indie|db_|console)                { return 404; }

        location ~ \.php(?:$|/) {
            rewrite ^/(?!index|remote|public|cron|core\/ajax\/update|status|ocs\/v[12]|updater\/.+|oc[sm]-provider\/.+|.+\/richdocumentscode\/proxy) /index.php$request_uri;

            fastcgi_split_path_info ^(.+?\.php)(/.*)$;
            set $path_info $fastcgi_path_info;

            try_files $fastcgi_script_name =404;

            include fastcgi_params;
            fastcgi_param SCRIPT_FILENAME $document_root$fastcgi_script_name;
            fastcgi_param PATH_INFO $path_info;
            fastcgi_param HTTPS on;

            fastcgi_param modHeadersAvailable true;
            fastcgi_param front_controller_active true;
            fastcgi_pass php-handler;

            fastcgi_intercept_errors on;
            fastcgi_request_buffering off;

            fastcgi_max_temp_file_size 0;
        }

        location ~ \.(?:css|js|mjs|svg|gif|png|jpg|ico|wasm|tflite|map|ogg|flac)$ {
            try_files $uri /index.php$request_uri;
            add_header Cache-Control "public, max-age=15778463";
            access_log off;

            location ~ \.woff2?$ {
                try_files $uri /index.php$request_uri;
                expires 7d;
                access_log off;
            }

            location /remote {
                return 301 /remote.php$request_uri;
            }
        }

        location / {
            try_files $uri $uri/ /index.php$request_uri;
        }
    }
}"#;

/// One `sed` per instance writing `nginx/nginx{N}.conf` with the
/// upstream pointed at that instance's app container.
#[must_use]
pub fn config_commands(instances: &[Instance]) -> String {
    per_instance(instances, "\n", |n, _| {
        format!(
            "sed 's/{APP_PLACEHOLDER}/{}/g' {TEMPLATE_PATH} > nginx/{}.conf",
            app_container(n),
            web_container(n)
        )
    })
}
