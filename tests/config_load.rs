use puppyhouse::config::{Config, EngineConfig};
use tempfile::TempDir;

#[tokio::test]
async fn default_config_round_trips_through_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    let path = path.to_str().unwrap();

    Config::create_default(path).await.unwrap();
    let config = Config::load(path).await.unwrap();
    assert_eq!(config.engine, EngineConfig::default());
    assert_eq!(config.kennel.default_puppy_name, "My Puppy");
    assert_eq!(config.storage.data_dir, "./data");
    assert_eq!(config.logging.level, "info");
}

#[tokio::test]
async fn missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");
    let err = Config::load(path.to_str().unwrap()).await.unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[tokio::test]
async fn engine_overrides_are_applied() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fast.toml");
    std::fs::write(
        &path,
        r#"
[kennel]
name = "Fast Kennel"
default_breed = "beagle"

[storage]
data_dir = "/tmp/fast"
db_path = "/tmp/fast/db"

[engine]
energy_tick_ms = 1000
ms_per_day = 10000

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = Config::load(path.to_str().unwrap()).await.unwrap();
    assert_eq!(config.kennel.name, "Fast Kennel");
    assert_eq!(config.kennel.default_breed, "beagle");
    assert_eq!(config.kennel.pool_puppy_name, "Lonely Puppy");
    assert_eq!(config.engine.energy_tick_ms, 1000);
    assert_eq!(config.engine.ms_per_day, 10_000);
    assert_eq!(config.engine.activity_log_cap, 50);
    assert_eq!(
        config.storage.kennel_db_path(),
        std::path::PathBuf::from("/tmp/fast/db")
    );
}

#[tokio::test]
async fn malformed_toml_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(&path, "[storage\ndata_dir = 3").unwrap();
    let err = Config::load(path.to_str().unwrap()).await.unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
