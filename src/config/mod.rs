mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use trackdeck_common::paths::validate_segment;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_paths(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./trackdeck.toml",
        "~/.config/trackdeck/config.toml",
        "/etc/trackdeck/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

fn expand(path: &mut PathBuf) {
    if let Some(s) = path.to_str() {
        let expanded = shellexpand::tilde(s).into_owned();
        *path = PathBuf::from(expanded);
    }
}

fn expand_paths(config: &mut Config) {
    if let Some(root) = config.media.root.as_mut() {
        expand(root);
    }
    if let Some(dir) = config.server.static_dir.as_mut() {
        expand(dir);
    }
    expand(&mut config.catalog.snapshot_path);
    expand(&mut config.catalog.tracks_csv);
    expand(&mut config.catalog.albums_csv);
    expand(&mut config.catalog.db_path);
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if let Some(root) = &config.media.root {
        if !root.is_absolute() {
            anyhow::bail!("Media root must be an absolute path: {:?}", root);
        }
        if !root.is_dir() {
            tracing::warn!("Media root does not exist: {:?}", root);
        }
    }

    for (kind, name) in [
        ("cover_file", &config.media.cover_file),
        ("audio_file", &config.media.audio_file),
        ("video_file", &config.media.video_file),
    ] {
        if let Err(e) = validate_segment(name) {
            anyhow::bail!("media.{} must be a plain file name, got {:?}: {}", kind, name, e);
        }
    }

    for path in config.catalog.source_paths() {
        if path.as_os_str().is_empty() {
            anyhow::bail!(
                "Catalog source '{}' is selected but its path is empty",
                config.catalog.source
            );
        }
    }

    if config.catalog.probe_media && config.media.root.is_none() {
        tracing::warn!("catalog.probe_media is set but no media root is configured");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.catalog.source, CatalogSourceKind::Snapshot);
        assert_eq!(config.media.cover_file, "square.png");
        assert!(config.media.root.is_none());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(
            r#"
            [server]
            port = 9000

            [catalog]
            source = "csv"
            tracks_csv = "/srv/export/tracks.csv"
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.catalog.source, CatalogSourceKind::Csv);
        assert_eq!(config.catalog.tracks_csv, PathBuf::from("/srv/export/tracks.csv"));
        assert_eq!(config.catalog.albums_csv, PathBuf::from("data/albums.csv"));
    }

    #[test]
    fn test_rejects_zero_port() {
        let file = write_config("[server]\nport = 0\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_rejects_relative_media_root() {
        let file = write_config("[media]\nroot = \"media/songs\"\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn test_rejects_media_filename_with_separator() {
        let mut config = Config::default();
        config.media.audio_file = "../song.mp3".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_media_filename_dot_entries() {
        for name in ["..", ".", "", " "] {
            let mut config = Config::default();
            config.media.video_file = name.into();
            let err = validate_config(&config).unwrap_err();
            assert!(err.to_string().contains("media.video_file"), "{name:?}: {err}");
        }
    }

    #[test]
    fn test_rejects_empty_source_path() {
        let mut config = Config::default();
        config.catalog.source = CatalogSourceKind::Database;
        config.catalog.db_path = PathBuf::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_source_fails_to_parse() {
        let file = write_config("[catalog]\nsource = \"supabase\"\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_media_filename_by_kind() {
        let media = MediaConfig::default();
        assert_eq!(media.filename(trackdeck_common::MediaKind::Audio), "song.mp3");
        assert_eq!(media.filename(trackdeck_common::MediaKind::Video), "video.mp4");
    }
}
