use docker_compose_types::{Compose, DependsOnOptions, Networks};
use nextcloud_caddy_gen::{Config, compose};

fn config() -> Config {
    Config::new("nc", "a@b.com")
        .instance("cloud.example.org", "alice")
        .instance("files.example.net", "bob")
}

/// Body of the quoted `docker-compose.yml` heredoc.
fn compose_file(script: &str) -> String {
    let opener = "cat > docker-compose.yml << 'COMPOSE'\n";
    let from = script.find(opener).unwrap() + opener.len();
    let len = script[from..].find("\nCOMPOSE\n").unwrap();
    script[from..from + len].to_string()
}

#[test]
fn heredoc_is_valid_compose() {
    let yaml = compose_file(&compose(&config()));

    let parsed: Compose = serde_yaml::from_str(&yaml).expect("compose parse failed");

    let names: Vec<&str> = parsed.services.0.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "caddy",
            "nextcloud1",
            "nginx1",
            "nextcloud1-cron",
            "db1",
            "redis1",
            "nextcloud2",
            "nginx2",
            "nextcloud2-cron",
            "db2",
            "redis2",
        ]
    );
}

#[test]
fn container_names() {
    let yaml = compose_file(&compose(&config()));
    let parsed: Compose = serde_yaml::from_str(&yaml).unwrap();

    let container = |svc: &str| {
        parsed.services.0[svc]
            .as_ref()
            .and_then(|s| s.container_name.clone())
            .unwrap()
    };

    assert_eq!(container("caddy"), "caddy");
    assert_eq!(container("nextcloud2"), "nextcloud2-app");
    assert_eq!(container("nginx2"), "nginx2");
    assert_eq!(container("db1"), "nextcloud1-db");
    assert_eq!(container("redis1"), "nextcloud1-redis");
}

#[test]
fn proxy_depends_on_every_web_tier() {
    let yaml = compose_file(&compose(&config()));
    let parsed: Compose = serde_yaml::from_str(&yaml).unwrap();

    let caddy = parsed.services.0["caddy"].as_ref().unwrap();
    match &caddy.depends_on {
        DependsOnOptions::Simple(deps) => assert_eq!(deps, &["nginx1", "nginx2"]),
        other => panic!("unexpected depends_on: {other:?}"),
    }
}

#[test]
fn backend_networks_are_isolated() {
    let yaml = compose_file(&compose(&config()));
    let parsed: Compose = serde_yaml::from_str(&yaml).unwrap();

    let networks = |svc: &str| match &parsed.services.0[svc].as_ref().unwrap().networks {
        Networks::Simple(list) => list.clone(),
        other => panic!("unexpected networks: {other:?}"),
    };

    assert_eq!(networks("nextcloud1"), vec!["backend1", "proxy-tier"]);
    assert_eq!(networks("nginx2"), vec!["backend2", "proxy-tier"]);
    assert_eq!(networks("db2"), vec!["backend2"]);
    assert_eq!(networks("redis1"), vec!["backend1"]);
    assert_eq!(networks("nextcloud2-cron"), vec!["backend2"]);
}

#[test]
fn top_level_declarations() {
    let yaml = compose_file(&compose(&config()));
    let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

    let volumes = doc["volumes"].as_mapping().unwrap();
    assert_eq!(volumes.len(), 6);
    assert!(volumes.contains_key("nc2_html"));
    assert!(volumes.contains_key("redis1_data"));

    let networks = &doc["networks"];
    assert_eq!(networks.as_mapping().unwrap().len(), 3);
    assert!(networks["proxy-tier"].is_null());
    assert_eq!(networks["backend1"]["internal"], serde_yaml::Value::Bool(true));
    assert_eq!(networks["backend2"]["internal"], serde_yaml::Value::Bool(true));
}

#[test]
fn secrets_are_compose_references() {
    let yaml = compose_file(&compose(&config()));
    let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

    let db = &doc["services"]["db2"]["environment"];
    assert_eq!(db["POSTGRES_PASSWORD"].as_str(), Some("${DB2_PASSWORD}"));
    assert_eq!(db["POSTGRES_DB"].as_str(), Some("nextcloud2"));

    let redis = &doc["services"]["redis1"]["command"];
    assert_eq!(
        redis.as_str(),
        Some("redis-server --requirepass ${REDIS1_PASSWORD}")
    );
}
