//! Per-step slice types.
//!
//! Each wizard step owns exactly one slice. Slices are independent records:
//! mutators merge partial updates into a single slice and never reach across
//! step boundaries. Cross-step links (the step-4 navigation bar and step-3
//! logo consumed by step-5 mockups) are denormalized as URL + id pairs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ts_rs::TS;

/// Step 1 — app concept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ConceptData {
    pub app_name: String,
    pub description: String,
    /// Store category (e.g. "fitness", "productivity").
    pub category: String,
    /// Moved here from step 6 in schema v3.
    pub target_platform: String,
}

/// A user-supplied reference image on the mood board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ReferenceImage {
    pub id: String,
    pub url: String,
    /// Where the image came from ("upload", "url", "library").
    pub source: String,
}

/// Step 2 — mood board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct MoodboardData {
    pub reference_images: Vec<ReferenceImage>,
    pub notes: String,
}

/// How the user provides branding: AI extraction from the mood board, or
/// manual entry (which bypasses the mood-board requirement).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EntryMode {
    #[default]
    AiExtract,
    Manual,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct BrandPalette {
    pub id: String,
    pub name: String,
    /// Hex color strings, primary first.
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct TypographyChoice {
    pub id: String,
    pub heading_font: String,
    pub body_font: String,
}

/// A generated logo the user picked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct LogoSelection {
    pub id: String,
    pub url: String,
    /// Prompt that produced the logo, kept for regeneration.
    pub prompt: String,
    pub credits_used: u32,
}

/// Step 3 — branding (palette, typography, style direction, logo).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct BrandingData {
    pub entry_mode: EntryMode,
    /// Options returned by the style-extraction service.
    pub palette_options: Vec<BrandPalette>,
    pub typography_options: Vec<TypographyChoice>,
    pub style_direction_options: Vec<String>,
    pub selected_palette: Option<BrandPalette>,
    pub selected_typography: Option<TypographyChoice>,
    pub style_direction: String,
    pub logo: Option<LogoSelection>,
    pub splash_url: Option<String>,
    /// Fingerprint of the mood-board image ids the last extraction ran over.
    /// Compared set-wise to decide whether re-extraction is needed.
    pub last_extracted_fingerprint: Option<String>,
}

impl BrandingData {
    /// Whether the style options are stale relative to the current mood board.
    pub fn needs_reextraction(&self, moodboard: &MoodboardData) -> bool {
        let ids: Vec<&str> = moodboard
            .reference_images
            .iter()
            .map(|img| img.id.as_str())
            .collect();
        self.last_extracted_fingerprint.as_deref() != Some(extraction_fingerprint(&ids).as_str())
    }
}

/// Order-insensitive fingerprint of a set of mood-board image ids.
pub fn extraction_fingerprint(ids: &[&str]) -> String {
    let mut sorted: Vec<&str> = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    let mut hasher = Sha256::new();
    for id in sorted {
        hasher.update(id.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Functional kind of a screen; drives ticket prioritization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ScreenKind {
    Home,
    Auth,
    List,
    Detail,
    Settings,
    #[default]
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ScreenSpec {
    pub id: String,
    pub name: String,
    pub purpose: String,
    pub kind: ScreenKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NavStyle {
    #[default]
    Tabs,
    Drawer,
    Stack,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct NavItem {
    pub screen_id: String,
    pub label: String,
    pub icon: String,
}

/// Navigation bar configuration generated in step 4 and consumed by screen
/// generation in step 5.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct NavigationConfig {
    pub style: NavStyle,
    pub items: Vec<NavItem>,
    /// Generated bar artwork; id kept alongside the URL so step 5 can
    /// reference the asset without re-resolving it.
    pub bar_image_url: Option<String>,
    pub bar_image_id: Option<String>,
}

/// Step 4 — screen list and navigation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ScreensData {
    pub screens: Vec<ScreenSpec>,
    /// Designated initial/home screen.
    pub initial_screen_id: Option<String>,
    pub navigation: Option<NavigationConfig>,
}

impl ScreensData {
    pub fn screen(&self, id: &str) -> Option<&ScreenSpec> {
        self.screens.iter().find(|s| s.id == id)
    }
}

/// One generated mockup variation for a step-4 screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct GeneratedScreen {
    pub id: String,
    /// Id of the step-4 screen this variation was generated for.
    pub screen_id: String,
    pub variant: u32,
    pub image_url: String,
    pub selected: bool,
    pub credits_used: u32,
}

/// Step 5 — generated screen variations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct MockupsData {
    pub generated: Vec<GeneratedScreen>,
    /// Denormalized copies of the step-4 navigation bar asset, so generation
    /// requests carry a self-contained payload.
    pub nav_bar_url: Option<String>,
    pub nav_bar_id: Option<String>,
    /// Denormalized copies of the step-3 logo.
    pub logo_url: Option<String>,
    pub logo_id: Option<String>,
}

impl MockupsData {
    pub fn selected_count(&self) -> usize {
        self.generated.iter().filter(|g| g.selected).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct IntegrationSelection {
    /// Integration id from the catalog (e.g. "supabase", "stripe").
    pub id: String,
    pub enabled: bool,
    /// Free-form user note, carried into the derived integration ticket.
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ModelField {
    pub name: String,
    pub field_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct DataModel {
    pub id: String,
    pub name: String,
    pub fields: Vec<ModelField>,
}

/// Step 6 — integrations and data models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct IntegrationsData {
    pub integrations: Vec<IntegrationSelection>,
    pub data_models: Vec<DataModel>,
}

impl IntegrationsData {
    pub fn enabled(&self) -> impl Iterator<Item = &IntegrationSelection> {
        self.integrations.iter().filter(|i| i.enabled)
    }
}

/// Step 7 — final packaging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct PackagingData {
    pub project_name: String,
    pub bundle_id: String,
    pub version_label: String,
    pub include_test_suite: bool,
}
