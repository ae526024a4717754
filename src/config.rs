use crate::theme::Theme;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{PoisonError, RwLock};

/// Spacing used by every layout stage. Sizes and gaps are in px.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeConfig {
    pub card_width: f32,
    pub card_height: f32,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
    pub spouse_spacing: f32,
    /// Zoom clamp for viewers; the layout math ignores it.
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            card_width: 200.0,
            card_height: 120.0,
            horizontal_spacing: 300.0,
            vertical_spacing: 200.0,
            spouse_spacing: 40.0,
            min_scale: 0.3,
            max_scale: 2.0,
        }
    }
}

/// Subdivisions per px of the layout grid. Coordinates and steps on this grid
/// add and subtract exactly in f32 for trees up to 2^19 px across.
const LAYOUT_GRID: f32 = 16.0;

/// Rounds `value` to the nearest 1/16 px.
pub fn snap_to_grid(value: f32) -> f32 {
    (value * LAYOUT_GRID).round() / LAYOUT_GRID
}

impl TreeConfig {
    /// Distance between neighbouring unit centers on one level.
    pub fn horizontal_step(&self) -> f32 {
        snap_to_grid(self.card_width + self.horizontal_spacing).max(1.0)
    }

    /// Distance between adjacent levels.
    pub fn vertical_step(&self) -> f32 {
        snap_to_grid(self.card_height + self.vertical_spacing).max(1.0)
    }

    /// Distance between the two partners of a couple.
    pub fn spouse_step(&self) -> f32 {
        snap_to_grid(self.card_width + self.spouse_spacing)
    }

    pub fn apply(&mut self, patch: &TreeConfigPatch) {
        if let Some(v) = patch.card_width {
            self.card_width = v;
        }
        if let Some(v) = patch.card_height {
            self.card_height = v;
        }
        if let Some(v) = patch.horizontal_spacing {
            self.horizontal_spacing = v;
        }
        if let Some(v) = patch.vertical_spacing {
            self.vertical_spacing = v;
        }
        if let Some(v) = patch.spouse_spacing {
            self.spouse_spacing = v;
        }
        if let Some(v) = patch.min_scale {
            self.min_scale = v;
        }
        if let Some(v) = patch.max_scale {
            self.max_scale = v;
        }
    }
}

/// Partial update of [`TreeConfig`]; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeConfigPatch {
    pub card_width: Option<f32>,
    pub card_height: Option<f32>,
    pub horizontal_spacing: Option<f32>,
    pub vertical_spacing: Option<f32>,
    pub spouse_spacing: Option<f32>,
    pub min_scale: Option<f32>,
    pub max_scale: Option<f32>,
}

static TREE_CONFIG: Lazy<RwLock<TreeConfig>> = Lazy::new(|| RwLock::new(TreeConfig::default()));

/// Snapshot of the process-wide spacing configuration.
pub fn tree_config() -> TreeConfig {
    TREE_CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Merges `patch` into the process-wide configuration. Existing layouts are
/// not recomputed.
pub fn update_tree_config(patch: &TreeConfigPatch) -> TreeConfig {
    let mut guard = TREE_CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    guard.apply(patch);
    tracing::debug!(config = ?*guard, "tree config updated");
    guard.clone()
}

pub fn reset_tree_config() {
    let mut guard = TREE_CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    *guard = TreeConfig::default();
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub tree: TreeConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            tree: TreeConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    tree: Option<TreeConfigPatch>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    card_fill: Option<String>,
    card_fill_male: Option<String>,
    card_fill_female: Option<String>,
    card_border: Option<String>,
    current_user_border: Option<String>,
    text_color: Option<String>,
    secondary_text_color: Option<String>,
    line_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.card_fill {
            config.theme.card_fill = v;
        }
        if let Some(v) = vars.card_fill_male {
            config.theme.card_fill_male = v;
        }
        if let Some(v) = vars.card_fill_female {
            config.theme.card_fill_female = v;
        }
        if let Some(v) = vars.card_border {
            config.theme.card_border = v;
        }
        if let Some(v) = vars.current_user_border {
            config.theme.current_user_border = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.secondary_text_color {
            config.theme.secondary_text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(tree) = parsed.tree {
        config.tree.apply(&tree);
    }

    config.render.background = config.theme.background.clone();
    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_add_card_size_to_gaps() {
        let config = TreeConfig::default();
        assert_eq!(config.horizontal_step(), 500.0);
        assert_eq!(config.vertical_step(), 320.0);
        assert_eq!(config.spouse_step(), 240.0);
    }

    #[test]
    fn degenerate_steps_are_floored() {
        let config = TreeConfig {
            card_width: 0.0,
            horizontal_spacing: -50.0,
            card_height: 0.0,
            vertical_spacing: 0.0,
            ..TreeConfig::default()
        };
        assert_eq!(config.horizontal_step(), 1.0);
        assert_eq!(config.vertical_step(), 1.0);
    }

    #[test]
    fn fractional_steps_snap_to_sixteenths() {
        let config = TreeConfig {
            card_height: 120.1,
            spouse_spacing: 40.03,
            ..TreeConfig::default()
        };
        assert_eq!(config.vertical_step(), 320.125);
        assert_eq!(config.spouse_step(), 240.0);
        assert_eq!(snap_to_grid(166.66667), 166.6875);
        assert_eq!(snap_to_grid(-46.66667), -46.6875);
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut config = TreeConfig::default();
        config.apply(&TreeConfigPatch {
            spouse_spacing: Some(10.0),
            ..Default::default()
        });
        assert_eq!(config.spouse_spacing, 10.0);
        assert_eq!(config.card_width, 200.0);
    }

    #[test]
    fn config_file_merges_sections() {
        let config = parse_config(
            r##"{
                "theme": "classic",
                "themeVariables": { "lineColor": "#123456" },
                "tree": { "cardWidth": 160, "verticalSpacing": 100 },
                "render": { "width": 640 }
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.line_color, "#123456");
        assert_eq!(config.tree.card_width, 160.0);
        assert_eq!(config.tree.vertical_spacing, 100.0);
        assert_eq!(config.tree.horizontal_spacing, 300.0);
        assert_eq!(config.render.width, 640.0);
        assert_eq!(config.render.background, config.theme.background);
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.tree, TreeConfig::default());
    }
}
