//! Scene file handling
//!
//! A scene describes one dashboard page for the simulator: the viewport,
//! the laid-out regions, the widgets mounted on them and a timed script of
//! scroll, resize and locale actions.
//!
//! ```toml
//! [scene]
//! name = "People overview"
//! document_height = 3200
//!
//! [regions]
//! stats = { x = 0, y = 200, width = 1200, height = 180 }
//!
//! [[widget]]
//! name = "headcount"
//! kind = "counter"
//! region = "stats"
//! end = 1250
//!
//! [[script]]
//! at_ms = 1000
//! action = "scroll"
//! y = 1100
//! ```

use anyhow::{Context, Result};
use kinetic_animation::{
    CounterConfig, FadeInConfig, MorphConfig, ParallaxConfig, StaggerConfig, TypewriterConfig,
};
use kinetic_core::{Rect, Viewport};
use kinetic_i18n::{Catalog, Locale};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed scene file
#[derive(Debug, Deserialize, Serialize)]
pub struct SceneConfig {
    pub scene: SceneMetadata,
    #[serde(default)]
    pub regions: BTreeMap<String, RegionConfig>,
    #[serde(default, rename = "widget")]
    pub widgets: Vec<WidgetConfig>,
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SceneMetadata {
    pub name: String,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    /// Defaults to the viewport height
    #[serde(default)]
    pub document_height: Option<f32>,
    #[serde(default)]
    pub locale: Locale,
    /// Message catalog, relative to the scene file
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

fn default_viewport_width() -> f32 {
    1280.0
}

fn default_viewport_height() -> f32 {
    800.0
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct RegionConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RegionConfig {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct WidgetConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: WidgetKind,
}

/// Widget type and its options, tagged by `kind`
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetKind {
    Counter {
        #[serde(default)]
        region: Option<String>,
        #[serde(flatten)]
        config: CounterConfig,
    },
    Typewriter {
        /// Catalog key; overrides `text` when set
        #[serde(default)]
        key: Option<String>,
        #[serde(flatten)]
        config: TypewriterConfig,
    },
    FadeIn {
        #[serde(default)]
        region: Option<String>,
        #[serde(flatten)]
        config: FadeInConfig,
    },
    Parallax {
        #[serde(flatten)]
        config: ParallaxConfig,
    },
    Morph {
        items: Vec<String>,
        #[serde(flatten)]
        config: MorphConfig,
    },
    Stagger {
        #[serde(default)]
        region: Option<String>,
        items: usize,
        #[serde(flatten)]
        config: StaggerConfig,
    },
    ScrollProgress,
    Glow {
        accent: String,
        intensity: String,
    },
}

impl WidgetKind {
    pub fn label(&self) -> &'static str {
        match self {
            WidgetKind::Counter { .. } => "counter",
            WidgetKind::Typewriter { .. } => "typewriter",
            WidgetKind::FadeIn { .. } => "fade_in",
            WidgetKind::Parallax { .. } => "parallax",
            WidgetKind::Morph { .. } => "morph",
            WidgetKind::Stagger { .. } => "stagger",
            WidgetKind::ScrollProgress => "scroll_progress",
            WidgetKind::Glow { .. } => "glow",
        }
    }

    /// Region the widget is observed on, if any
    pub fn region(&self) -> Option<&str> {
        match self {
            WidgetKind::Counter { region, .. }
            | WidgetKind::FadeIn { region, .. }
            | WidgetKind::Stagger { region, .. } => region.as_deref(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ScriptStep {
    pub at_ms: u32,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    Scroll {
        #[serde(default)]
        x: f32,
        y: f32,
    },
    Resize {
        width: f32,
        height: f32,
    },
    SetLocale {
        locale: Locale,
    },
}

/// A scene together with the directory it was loaded from
#[derive(Debug)]
pub struct Scene {
    pub config: SceneConfig,
    pub base_dir: PathBuf,
}

impl Scene {
    /// Load and validate a scene file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = SceneConfig::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self { config, base_dir })
    }

    /// Message catalog named by the scene, or an empty one
    pub fn catalog(&self) -> Result<Catalog> {
        let Some(relative) = &self.config.scene.catalog else {
            return Ok(Catalog::default());
        };
        let path = self.base_dir.join(relative);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Catalog::from_toml_str(&content, Locale::default())
            .with_context(|| format!("Failed to parse catalog {}", path.display()))
    }
}

impl SceneConfig {
    pub fn parse(content: &str) -> Result<Self> {
        let config: SceneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural checks that do not need a host
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for widget in &self.widgets {
            if !names.insert(widget.name.as_str()) {
                anyhow::bail!("Duplicate widget name '{}'", widget.name);
            }
            if let Some(region) = widget.kind.region() {
                if !self.regions.contains_key(region) {
                    anyhow::bail!(
                        "Widget '{}' refers to unknown region '{}'",
                        widget.name,
                        region
                    );
                }
            }
        }

        for (name, region) in &self.regions {
            if region.width < 0.0 || region.height < 0.0 {
                anyhow::bail!("Region '{}' has a negative size", name);
            }
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        let mut viewport = Viewport::new(self.scene.viewport_width, self.scene.viewport_height);
        if let Some(height) = self.scene.document_height {
            viewport.document_height = height;
        }
        viewport
    }

    /// Script steps in execution order
    pub fn sorted_script(&self) -> Vec<ScriptStep> {
        let mut script = self.script.clone();
        script.sort_by_key(|step| step.at_ms);
        script
    }
}
