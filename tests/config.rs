use flightdelay::config::{
    Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ENV_BASE_URL, ENV_CONNECT_TIMEOUT, ENV_READ_TIMEOUT,
    ENV_TEMP_DIR, ENV_TRANSFER_TIMEOUT, DEFAULT_TRANSFER_TIMEOUT,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn defaults_match_published_dataset() {
    let cfg = Config::default();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.connect_timeout, Duration::from_secs(20));
    assert_eq!(cfg.read_timeout, DEFAULT_TIMEOUT);
    assert_eq!(cfg.transfer_timeout, DEFAULT_TRANSFER_TIMEOUT);
    assert!(cfg.temp_dir.is_none());
    cfg.validate().unwrap();
}

#[test]
fn toml_overrides_only_given_keys() -> anyhow::Result<()> {
    let cfg = Config::from_toml_str(
        r#"
        base_url = "http://localhost:8080/expo"
        read_timeout_secs = 5
        transfer_timeout_secs = 600
        "#,
    )?;
    assert_eq!(cfg.base_url, "http://localhost:8080/expo");
    assert_eq!(cfg.read_timeout, Duration::from_secs(5));
    assert_eq!(cfg.transfer_timeout, Duration::from_secs(600));
    assert_eq!(cfg.connect_timeout, DEFAULT_TIMEOUT);
    Ok(())
}

#[test]
fn toml_rejects_unknown_keys_and_zero_timeouts() {
    assert!(Config::from_toml_str("timeout = 3").is_err());
    assert!(Config::from_toml_str("connect_timeout_secs = 0").is_err());
    assert!(Config::from_toml_str("transfer_timeout_secs = 0").is_err());
    assert!(Config::from_toml_str("base_url = \"\"").is_err());
}

#[test]
fn load_reads_file() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("flightdelay.toml");
    std::fs::write(&path, "temp_dir = \"/var/tmp\"\n")?;
    let cfg = Config::load(&path)?;
    assert_eq!(cfg.temp_dir, Some(PathBuf::from("/var/tmp")));

    let missing = Config::load(tmp.path().join("absent.toml")).unwrap_err();
    assert!(format!("{missing:#}").contains("absent.toml"));
    Ok(())
}

#[test]
fn variables_override_file_values() -> anyhow::Result<()> {
    let vars: HashMap<&str, &str> = HashMap::from([
        (ENV_BASE_URL, "http://mirror.example"),
        (ENV_CONNECT_TIMEOUT, "3"),
        (ENV_READ_TIMEOUT, " 7 "),
        (ENV_TRANSFER_TIMEOUT, "90"),
        (ENV_TEMP_DIR, "/scratch"),
    ]);
    let cfg = Config::from_toml_str("base_url = \"http://file.example\"")?
        .apply_vars(|k| vars.get(k).map(|v| (*v).to_string()))?;
    assert_eq!(cfg.base_url, "http://mirror.example");
    assert_eq!(cfg.connect_timeout, Duration::from_secs(3));
    assert_eq!(cfg.read_timeout, Duration::from_secs(7));
    assert_eq!(cfg.transfer_timeout, Duration::from_secs(90));
    assert_eq!(cfg.temp_dir, Some(PathBuf::from("/scratch")));
    Ok(())
}

#[test]
fn variables_reject_bad_timeouts() {
    let err = Config::default()
        .apply_vars(|k| (k == ENV_READ_TIMEOUT).then(|| "soon".to_string()))
        .unwrap_err();
    assert!(format!("{err:#}").contains(ENV_READ_TIMEOUT));

    assert!(
        Config::default()
            .apply_vars(|k| (k == ENV_CONNECT_TIMEOUT).then(|| "0".to_string()))
            .is_err()
    );
}
