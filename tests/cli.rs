use std::fs;

use clap::Parser;
use nextcloud_caddy_gen::cli::{self, Cli};
use nextcloud_caddy_gen::{Config, GenError, compose};

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["nextcloud-caddy-gen"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("parse failed")
}

#[test]
fn generate_from_flags_writes_script() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("deploy.sh");
    let out_str = out.to_str().unwrap();

    let cli = parse(&[
        "generate",
        "--project-dir",
        "nc",
        "--email",
        "a@b.com",
        "--instance",
        "cloud.x.com",
        "--output",
        out_str,
    ]);
    cli::run(&cli).expect("generate");

    let written = fs::read_to_string(&out).unwrap();
    let expected = compose(&Config::new("nc", "a@b.com").instance("cloud.x.com", "admin"));
    assert_eq!(written, expected);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&out).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[test]
fn flags_extend_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("deploy.yml");
    fs::write(
        &config_path,
        "projectDir: from-file\nacmeEmail: file@b.com\ninstances:\n  - domain: one.dev\n",
    )
    .unwrap();
    let out = dir.path().join("deploy.sh");

    let cli = parse(&[
        "generate",
        "--config",
        config_path.to_str().unwrap(),
        "--email",
        "flag@b.com",
        "--instance",
        "two.dev:bob",
        "-o",
        out.to_str().unwrap(),
    ]);
    cli::run(&cli).expect("generate");

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("PROJECT_DIR=\"from-file\""));
    assert!(written.contains("ACME_EMAIL=\"flag@b.com\""));
    assert!(written.contains("DOMAIN1=\"one.dev\""));
    assert!(written.contains("DOMAIN2=\"two.dev\""));
    assert!(written.contains("NC2_ADMIN_USER=bob"));
}

#[test]
fn invalid_config_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("deploy.sh");

    let cli = parse(&[
        "generate",
        "--email",
        "a@b.com",
        "--output",
        out.to_str().unwrap(),
    ]);
    let err = cli::run(&cli).unwrap_err();

    assert!(matches!(err, GenError::NoInstances));
    assert!(!out.exists());
}

#[test]
fn duplicate_domains_are_rejected() {
    let cli = parse(&[
        "generate",
        "--email",
        "a@b.com",
        "--instance",
        "x.dev",
        "--instance",
        "x.dev:other",
    ]);

    assert!(matches!(cli::run(&cli), Err(GenError::DuplicateDomain(_))));
}

#[test]
fn init_writes_loadable_starter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("deploy.yaml");

    cli::run(&parse(&["init", "--output", path.to_str().unwrap()])).expect("init");

    let config = Config::from_path(&path).unwrap();
    assert_eq!(config, Config::starter());
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("deploy.yaml");
    fs::write(&path, "keep me").unwrap();
    let path_str = path.to_str().unwrap();

    let err = cli::run(&parse(&["init", "-o", path_str])).unwrap_err();
    assert!(matches!(err, GenError::FileExists(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");

    cli::run(&parse(&["init", "-o", path_str, "--force"])).expect("forced init");
    assert!(fs::read_to_string(&path).unwrap().contains("projectDir"));
}

#[test]
fn init_logging_twice_is_harmless() {
    cli::init_logging(0);
    cli::init_logging(2);
}
