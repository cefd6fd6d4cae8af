use sockhttp::config::{Config, DispatchMode};

// Environment variables are process-wide, so every env-driven case lives in
// this one test to keep parallel tests from interfering.
#[test]
fn test_config_load_from_env() {
    unsafe {
        std::env::remove_var("CONFIG");
        std::env::remove_var("LISTEN");
        std::env::remove_var("WORKERS");
    }
    let cfg = Config::load();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8888");
    assert_eq!(cfg.server.workers, 4);

    unsafe {
        std::env::set_var("LISTEN", "0.0.0.0:3000");
        std::env::set_var("WORKERS", "16");
    }
    let cfg = Config::load();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.server.workers, 16);

    unsafe {
        std::env::set_var("WORKERS", "many");
    }
    let cfg = Config::load();
    assert_eq!(cfg.server.workers, 4);

    unsafe {
        std::env::set_var("CONFIG", "/nonexistent/sockhttp.yaml");
        std::env::remove_var("LISTEN");
        std::env::remove_var("WORKERS");
    }
    let cfg = Config::load();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8888");

    unsafe {
        std::env::remove_var("CONFIG");
    }
}

#[test]
fn test_config_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8888");
    assert_eq!(cfg.server.backlog, 1000);
    assert_eq!(cfg.server.server_name, "sockhttp");
    assert_eq!(cfg.server.dispatch, DispatchMode::Pool);
}

#[test]
fn test_config_full_yaml() {
    let yaml = r#"
server:
  listen_addr: "0.0.0.0:9000"
  backlog: 64
  workers: 2
  server_name: "test-server"
  dispatch: inline
"#;
    let cfg = Config::from_yaml_str(yaml).unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:9000");
    assert_eq!(cfg.server.backlog, 64);
    assert_eq!(cfg.server.workers, 2);
    assert_eq!(cfg.server.server_name, "test-server");
    assert_eq!(cfg.server.dispatch, DispatchMode::Inline);
}

#[test]
fn test_config_partial_yaml_keeps_defaults() {
    let yaml = "server:\n  workers: 8\n";
    let cfg = Config::from_yaml_str(yaml).unwrap();
    assert_eq!(cfg.server.workers, 8);
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8888");
    assert_eq!(cfg.server.backlog, 1000);
}

#[test]
fn test_config_zero_workers_clamped() {
    let cfg = Config::from_yaml_str("server:\n  workers: 0\n").unwrap();
    assert_eq!(cfg.server.workers, 1);
}

#[test]
fn test_config_rejects_unknown_dispatch() {
    let result = Config::from_yaml_str("server:\n  dispatch: threads\n");
    assert!(result.is_err());
}

#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join(format!("sockhttp-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "server:\n  listen_addr: \"127.0.0.1:0\"\n").unwrap();

    let cfg = Config::from_file(&path).unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:0");

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_config_from_missing_file() {
    assert!(Config::from_file("/nonexistent/sockhttp.yaml").is_err());
}
