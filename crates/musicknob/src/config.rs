use crate::events::AppEvent;
use async_channel::Sender;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use directories::ProjectDirs;
use knobcore::knob::DEFAULT_LIMITING_ANGLE;
use knobcore::seekbar::DEFAULT_BARS_COUNT;
use knobcore::{GeometryError, Screen};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::{Srgb, Srgba};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// `#rrggbb` colour as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr, SerializeDisplay)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn to_srgba(self) -> Srgba<f64> {
        let (r, g, b) = self.0.into_format::<f64>().into_components();
        Srgba::new(r, g, b, 1.0)
    }
}

impl FromStr for HexColor {
    type Err = palette::rgb::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<Srgb<u8>>().map(Self)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub knob_size: i32,
    pub seek_height: i32,
    pub seek_min_width: i32,
    pub spacing: i32,
    pub padding: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            knob_size: 120,
            seek_height: 30,
            seek_min_width: 260,
            spacing: 20,
            padding: 26,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub knob_image: Option<PathBuf>,
    pub active: HexColor,
    pub inactive: HexColor,
    pub background: HexColor,
    pub border: HexColor,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            knob_image: None,
            active: HexColor::new(0x00, 0xff, 0x00),
            inactive: HexColor::new(0x44, 0x44, 0x44),
            background: HexColor::new(0x12, 0x12, 0x12),
            border: HexColor::new(0x00, 0xff, 0x00),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub limiting_angle: f64,
    pub bars_count: usize,
    pub layout: LayoutConfig,
    pub appearance: AppearanceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limiting_angle: DEFAULT_LIMITING_ANGLE,
            bars_count: DEFAULT_BARS_COUNT,
            layout: LayoutConfig::default(),
            appearance: AppearanceConfig::default(),
        }
    }
}

impl Config {
    pub fn screen(&self) -> Result<Screen, GeometryError> {
        Screen::new(self.limiting_angle, self.bars_count)
    }

    /// Geometry and layout are fixed once the screen is built; only the
    /// appearance can change while running.
    pub fn requires_restart(&self, other: &Config) -> bool {
        self.limiting_angle != other.limiting_angle
            || self.bars_count != other.bars_count
            || self.layout != other.layout
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "musicknob", "musicknob")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Config, ConfigError> {
    let config: Config = builder.build()?.try_deserialize()?;
    config.screen()?;
    Ok(config)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    from_builder(
        config::Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(
                Environment::with_prefix("MUSICKNOB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
    )
}

pub fn load_or_setup() -> Config {
    match write_default_config() {
        Ok(path) => log::debug!("Using config at {}", path.display()),
        Err(e) => log::warn!("Could not set up default config: {}", e),
    }

    load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
        log::info!("Wrote default config to {}", path.display());
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(|p| p.to_path_buf()) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if is_reload_trigger(&event, &config_path) => {
                // editors save in several steps; wait for the burst to settle
                while let Ok(Ok(_)) =
                    tokio::time::timeout(RELOAD_SETTLE, bridge_rx.recv()).await
                {}

                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

const RELOAD_SETTLE: Duration = Duration::from_millis(150);

/// A deleted file keeps the running appearance; the rename or write that
/// usually follows triggers the reload instead.
fn is_reload_trigger(event: &notify::Event, config_path: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p == config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        from_builder(config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_default_file_matches_defaults() {
        assert_eq!(parse(DEFAULT_CONFIG).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse(
            r##"
bars_count = 12

[appearance]
active = "#ff8800"
"##,
        )
        .unwrap();

        assert_eq!(config.bars_count, 12);
        assert_eq!(config.limiting_angle, 25.0);
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.appearance.active, HexColor::new(0xff, 0x88, 0x00));
        assert_eq!(config.appearance.inactive, HexColor::new(0x44, 0x44, 0x44));
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        assert!(matches!(
            parse("bars_count = 0"),
            Err(ConfigError::Geometry(GeometryError::NoBars))
        ));
        assert!(matches!(
            parse("limiting_angle = 190.0"),
            Err(ConfigError::Geometry(GeometryError::InvalidLimitingAngle(_)))
        ));
    }

    #[test]
    fn test_hex_color_deserialization() {
        let cases = vec![
            ("\"#00ff00\"", HexColor::new(0, 255, 0)),
            ("\"00FF00\"", HexColor::new(0, 255, 0)),
            ("\"#121212\"", HexColor::new(0x12, 0x12, 0x12)),
        ];

        for (json, expected) in cases {
            let deserialized: HexColor = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<HexColor>("\"green\"").is_err());
        assert_eq!(HexColor::new(0, 255, 0).to_string(), "#00ff00");
    }

    #[test]
    fn test_reload_trigger_events() {
        use notify::event::{CreateKind, ModifyKind, RemoveKind};

        let path = PathBuf::from("/tmp/musicknob/config.toml");
        let event = |kind, p: &str| notify::Event::new(kind).add_path(PathBuf::from(p));

        let cases = vec![
            (EventKind::Modify(ModifyKind::Any), path.to_str().unwrap(), true),
            (EventKind::Create(CreateKind::File), path.to_str().unwrap(), true),
            (EventKind::Remove(RemoveKind::File), path.to_str().unwrap(), false),
            (EventKind::Modify(ModifyKind::Any), "/tmp/musicknob/config.toml~", false),
            (EventKind::Access(notify::event::AccessKind::Any), path.to_str().unwrap(), false),
        ];

        for (kind, p, expected) in cases {
            let triggered = is_reload_trigger(&event(kind.clone(), p), &path);
            assert_eq!(triggered, expected, "{kind:?} {p}");
        }
    }

    #[test]
    fn test_restart_detection() {
        let base = Config::default();

        let mut recolored = base.clone();
        recolored.appearance.active = HexColor::new(1, 2, 3);
        assert!(!base.requires_restart(&recolored));

        let mut rebarred = base.clone();
        rebarred.bars_count = 30;
        assert!(base.requires_restart(&rebarred));
    }
}
