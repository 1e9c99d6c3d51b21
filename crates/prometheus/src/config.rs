use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use prometheus_geometry::Point;
use prometheus_geometry::drag::{RotaryScale, max_scroll};
use prometheus_geometry::radial::{Direction, ItemLabel, NavWheel, WheelSizes};
use prometheus_geometry::viewport::Viewport;
use prometheus_geometry::zone::{Boundary, ScaleError, Zone, ZonedScale};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemConfig {
    pub direction: Option<Direction>,
    pub label: Option<ItemLabel>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MenuConfig {
    #[serde(default)]
    pub sizes: WheelSizes,
    /// Label of the hub section.
    #[serde(default)]
    pub hub: Option<ItemLabel>,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

fn non_blank(label: &ItemLabel) -> Option<ItemLabel> {
    let label = ItemLabel::new(label.as_str());
    (!label.is_blank()).then_some(label)
}

impl MenuConfig {
    pub fn build(&self, center: Point) -> NavWheel {
        let sections = self.items.iter().filter_map(|cfg| {
            let dir = cfg.direction?;
            Some((dir, non_blank(cfg.label.as_ref()?)?))
        });
        let hub = self.hub.as_ref().and_then(non_blank);
        NavWheel::new(sections, hub, center, self.sizes)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct DragConfig {
    /// Offset units per full turn, as a multiple of the scrollable extent.
    pub sweep_ratio: f64,
    /// Height of one row in the rotary list.
    pub item_extent: f64,
    /// Visible height of the rotary list.
    pub list_extent: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            sweep_ratio: RotaryScale::default().sweep_ratio,
            item_extent: 34.0,
            list_extent: 170.0,
        }
    }
}

impl DragConfig {
    pub fn scale(&self) -> RotaryScale {
        RotaryScale::new(self.sweep_ratio)
    }

    pub fn max_offset(&self, item_count: usize) -> f64 {
        max_scroll(item_count, self.item_extent, self.list_extent)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SliderConfig {
    pub span: f64,
    #[serde(default)]
    pub boundary: Boundary,
    pub zones: Vec<Zone>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub slider: Option<SliderConfig>,
}

impl Config {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.viewport.is_valid() {
            return Err(ConfigError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.slider_scale()?;
        Ok(())
    }

    /// The duration slider scale, custom zones when configured.
    pub fn slider_scale(&self) -> Result<ZonedScale, ConfigError> {
        match &self.slider {
            Some(s) => Ok(ZonedScale::new(s.span, s.boundary, s.zones.clone())?),
            None => Ok(ZonedScale::duration_slider()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid slider zones: {0}")]
    Scale(#[from] ScaleError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "prometheus", "prometheus")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("PROMETHEUS")
        .separator("__")
        .try_parsing(true)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(environment())
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Parses TOML text with the same rules as the config file.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(text, config::FileFormat::Toml))
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            default_config()
        }
    }
}

/// The embedded default configuration.
pub fn default_config() -> Config {
    parse_config(DEFAULT_CONFIG).unwrap_or_default()
}

/// Writes the embedded defaults to the user config path unless a file is
/// already there.
pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    if write_default_config_to(&path)? {
        log::info!("Wrote default config to {}", path.display());
    } else {
        log::info!("Keeping existing config at {}", path.display());
    }
    Ok(path)
}

/// Returns whether a new file was created.
pub fn write_default_config_to(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, DEFAULT_CONFIG)?;
    Ok(true)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Editors save in bursts (truncate, write, rename); one reload per burst.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(150);

fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher disabled: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };
    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Config watcher disabled: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    );
    let mut watcher = match watcher {
        Ok(w) => w,
        Err(e) => {
            log::error!("Config watcher disabled: {}", ConfigError::from(e));
            return;
        }
    };
    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch {}: {}", config_dir.display(), e);
        return;
    }
    log::debug!("Watching {} for changes", config_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if touches_config(&event, &config_path) => {
                // swallow the rest of the burst
                while let Ok(Ok(_)) =
                    tokio::time::timeout(RELOAD_DEBOUNCE, bridge_rx.recv()).await
                {}
                log::info!("Config file changed: {}", config_path.display());
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_geometry::zone::DurationUnit;

    #[test]
    fn test_default_config_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.menu.items.len(), 4);
        assert_eq!(config.drag.sweep_ratio, 2.0);
        assert_eq!(config.viewport, Viewport::new(1920.0, 1080.0));
        assert!(config.slider.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.menu.items.is_empty());
        assert_eq!(config.drag.item_extent, 34.0);
        assert_eq!(config.slider_scale().unwrap(), ZonedScale::duration_slider());
    }

    #[test]
    fn test_menu_items_by_direction() {
        let config = parse_config(
            r#"
            [[menu.items]]
            direction = "e"
            label = "Design"

            [[menu.items]]
            direction = "North"
            label = "Define"

            [[menu.items]]
            label = "Orphan"

            [[menu.items]]
            direction = "s"
            label = "   "
            "#,
        )
        .unwrap();
        let wheel = config.menu.build(Point::new(0.0, 0.0));
        let label = |d| wheel.section(d).map(|l| l.to_string());
        assert_eq!(label(Direction::North).as_deref(), Some("Define"));
        assert_eq!(label(Direction::East).as_deref(), Some("Design"));
        assert_eq!(label(Direction::South), None);
        assert!(wheel.hub_label().is_none());
    }

    #[test]
    fn test_default_wheel_matches_compass() {
        let wheel = default_config().menu.build(Point::new(0.0, 0.0));
        assert_eq!(wheel.hub_label().map(|l| l.as_str()), Some("Generate"));
        assert_eq!(wheel.section(Direction::West).map(|l| l.as_str()), Some("Format"));
        assert_eq!(wheel.radius(), 35.0);
    }

    #[test]
    fn test_custom_slider_zones() {
        let config = parse_config(
            r#"
            [slider]
            span = 10.0
            boundary = "upper"

            [[slider.zones]]
            start = 0.0
            end = 5.0
            min = 1
            max = 6
            unit = "hour"

            [[slider.zones]]
            start = 5.0
            end = 10.0
            min = 1
            max = 3
            unit = "Days"
            "#,
        )
        .unwrap();
        let scale = config.slider_scale().unwrap();
        assert_eq!(scale.boundary(), Boundary::Upper);
        assert_eq!(scale.zone_at(5.0).unit, DurationUnit::Days);
    }

    #[test]
    fn test_broken_slider_zones_are_rejected() {
        let result = parse_config(
            r#"
            [slider]
            span = 10.0

            [[slider.zones]]
            start = 0.0
            end = 4.0
            min = 1
            max = 6
            unit = "Hours"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Scale(_))));
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let result = parse_config(
            r#"
            [slider]
            span = 10.0

            [[slider.zones]]
            start = 0.0
            end = 10.0
            min = 1
            max = 6
            unit = "Fortnights"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Config(_))));
    }

    #[test]
    fn test_max_offset_from_list_size() {
        let drag = DragConfig::default();
        assert_eq!(drag.max_offset(10), 170.0);
        assert_eq!(drag.max_offset(2), 0.0);
        assert_eq!(drag.scale(), RotaryScale::new(2.0));
    }

    #[test]
    fn test_partial_drag_section_keeps_defaults() {
        let drag: DragConfig = serde_json::from_str(r#"{ "sweep_ratio": 1.0 }"#).unwrap();
        assert_eq!(drag.sweep_ratio, 1.0);
        assert_eq!(drag.list_extent, 170.0);
    }

    #[test]
    fn test_absurd_viewport_is_rejected() {
        let result = parse_config("[viewport]\nwidth = -1.0\n");
        assert!(matches!(result, Err(ConfigError::InvalidViewport { .. })));
        let result = parse_config("[viewport]\nwidth = inf\n");
        assert!(matches!(result, Err(ConfigError::InvalidViewport { .. })));
    }

    #[test]
    fn test_write_default_config_keeps_existing_file() {
        let dir = std::env::temp_dir().join(format!("prometheus-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");
        let _ = fs_err::remove_dir_all(&dir);

        assert!(write_default_config_to(&path).unwrap());
        fs_err::write(&path, "[drag]\nsweep_ratio = 1.0\n").unwrap();
        assert!(!write_default_config_to(&path).unwrap());
        let text = fs_err::read_to_string(&path).unwrap();
        assert_eq!(parse_config(&text).unwrap().drag.sweep_ratio, 1.0);

        fs_err::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_only_config_file_events_trigger_reload() {
        use notify::event::{CreateKind, ModifyKind};
        let path = PathBuf::from("/cfg/config.toml");
        let modify = notify::Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.clone());
        let other = notify::Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/cfg/other.toml"));
        let access = notify::Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(path.clone());
        assert!(touches_config(&modify, &path));
        assert!(!touches_config(&other, &path));
        assert!(!touches_config(&access, &path));
    }
}
