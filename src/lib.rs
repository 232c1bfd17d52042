//! Multi-tenant Nextcloud deployment scripts, generated from a
//! typed configuration.
//!
//! Give it a project directory, an ACME contact email and a list
//! of domain / admin-user pairs. It returns one self-contained
//! bash script that, run on a Docker host, stands up every
//! Nextcloud instance behind a single Caddy reverse proxy with
//! automatic HTTPS.
//!
//! Nothing is executed here. Generation is a pure function of the
//! configuration: no I/O, no randomness, no shared state. Secrets
//! are created by the emitted script when it runs.
//!
//! # Overview
//!
//! - [`Config`] and [`Instance`] describe what to deploy
//! - [`compose`] renders the script
//! - [`state::FormState`] models an interactive form producing a
//!   [`Config`]
//! - [`cli`] is the command-line front end
//!
//! Each instance is identified by its position. The instance at
//! index `i` is rendered with ordinal `i + 1`, which names its
//! variables (`DOMAIN2`, `DB2_PASSWORD`), containers (`nginx2`,
//! `nextcloud2-app`) and network (`backend2`).
//!
//! # What the script does
//!
//! 1. Checks Docker is installed and reachable, aborting if not
//! 2. Warns when a domain does not resolve to the server's IP
//! 3. Writes `.env`, `caddy/Caddyfile`, `nginx/nginx{N}.conf`,
//!    `docker-compose.yml` and `credentials.txt`
//! 4. Creates the `proxy-tier` network and one `backend{N}`
//!    network per instance, then runs `docker compose up -d`
//! 5. Fixes permissions, installs and configures each instance
//!    (every step tolerates an already applied state)
//! 6. Reports container status and writes `manage.sh`
//!
//! # Example
//!
//! ```
//! use nextcloud_caddy_gen::{Config, compose};
//!
//! let config = Config::new("nextcloud-caddy", "ops@example.com")
//!     .instance("cloud.example.com", "admin")
//!     .instance("files.example.net", "bob");
//!
//! config.validate().expect("invalid configuration");
//!
//! let script = compose(&config);
//! assert!(script.contains("DOMAIN2=\"files.example.net\""));
//! assert!(script.contains("    occ2)\n"));
//! ```
//!
//! # Trust boundary
//!
//! Field values are interpolated verbatim. Quotes or `$` in a
//! domain, user name, directory or email end up in the script
//! unescaped, so input must come from the operator who will run
//! it.

// Allow noisy pedantic lints that don't add value for a
// generator crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod banner;
pub mod caddyfile;
pub mod cli;
pub mod compose;
pub mod config;
pub mod credentials;
pub mod env;
pub mod error;
pub mod fragment;
pub mod manage;
pub mod nginx;
pub mod script;
pub mod setup;
pub mod state;

pub use config::{Config, Instance};
pub use error::{GenError, GenResult};
pub use script::compose;
pub use state::{Event, FormState};
