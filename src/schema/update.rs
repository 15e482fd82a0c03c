//! Statically-typed partial updates, one struct per step slice.
//!
//! Every slice field appears exactly once in its update struct, so adding a
//! schema field without extending the matching update is a compile-visible
//! omission rather than a silently dropped merge. `apply` performs a shallow
//! merge: `Some` fields overwrite, `None` fields leave the slice untouched.

use serde::Deserialize;

use super::steps::*;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConceptUpdate {
    pub app_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_platform: Option<String>,
}

impl ConceptUpdate {
    pub fn apply(self, slice: &mut ConceptData) {
        let ConceptUpdate {
            app_name,
            description,
            category,
            target_platform,
        } = self;
        if let Some(v) = app_name {
            slice.app_name = v;
        }
        if let Some(v) = description {
            slice.description = v;
        }
        if let Some(v) = category {
            slice.category = v;
        }
        if let Some(v) = target_platform {
            slice.target_platform = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoodboardUpdate {
    pub reference_images: Option<Vec<ReferenceImage>>,
    pub notes: Option<String>,
}

impl MoodboardUpdate {
    pub fn apply(self, slice: &mut MoodboardData) {
        let MoodboardUpdate {
            reference_images,
            notes,
        } = self;
        if let Some(v) = reference_images {
            slice.reference_images = v;
        }
        if let Some(v) = notes {
            slice.notes = v;
        }
    }
}

/// Branding update. `logo` and `splash_url` use a double `Option` so callers
/// can distinguish "leave unchanged" (`None`) from "clear the selection"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandingUpdate {
    pub entry_mode: Option<EntryMode>,
    pub palette_options: Option<Vec<BrandPalette>>,
    pub typography_options: Option<Vec<TypographyChoice>>,
    pub style_direction_options: Option<Vec<String>>,
    pub selected_palette: Option<Option<BrandPalette>>,
    pub selected_typography: Option<Option<TypographyChoice>>,
    pub style_direction: Option<String>,
    pub logo: Option<Option<LogoSelection>>,
    pub splash_url: Option<Option<String>>,
    pub last_extracted_fingerprint: Option<Option<String>>,
}

impl BrandingUpdate {
    pub fn apply(self, slice: &mut BrandingData) {
        let BrandingUpdate {
            entry_mode,
            palette_options,
            typography_options,
            style_direction_options,
            selected_palette,
            selected_typography,
            style_direction,
            logo,
            splash_url,
            last_extracted_fingerprint,
        } = self;
        if let Some(v) = entry_mode {
            slice.entry_mode = v;
        }
        if let Some(v) = palette_options {
            slice.palette_options = v;
        }
        if let Some(v) = typography_options {
            slice.typography_options = v;
        }
        if let Some(v) = style_direction_options {
            slice.style_direction_options = v;
        }
        if let Some(v) = selected_palette {
            slice.selected_palette = v;
        }
        if let Some(v) = selected_typography {
            slice.selected_typography = v;
        }
        if let Some(v) = style_direction {
            slice.style_direction = v;
        }
        if let Some(v) = logo {
            slice.logo = v;
        }
        if let Some(v) = splash_url {
            slice.splash_url = v;
        }
        if let Some(v) = last_extracted_fingerprint {
            slice.last_extracted_fingerprint = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreensUpdate {
    pub screens: Option<Vec<ScreenSpec>>,
    pub initial_screen_id: Option<Option<String>>,
    pub navigation: Option<Option<NavigationConfig>>,
}

impl ScreensUpdate {
    pub fn apply(self, slice: &mut ScreensData) {
        let ScreensUpdate {
            screens,
            initial_screen_id,
            navigation,
        } = self;
        if let Some(v) = screens {
            slice.screens = v;
        }
        if let Some(v) = initial_screen_id {
            slice.initial_screen_id = v;
        }
        if let Some(v) = navigation {
            slice.navigation = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MockupsUpdate {
    pub generated: Option<Vec<GeneratedScreen>>,
    pub nav_bar_url: Option<Option<String>>,
    pub nav_bar_id: Option<Option<String>>,
    pub logo_url: Option<Option<String>>,
    pub logo_id: Option<Option<String>>,
}

impl MockupsUpdate {
    pub fn apply(self, slice: &mut MockupsData) {
        let MockupsUpdate {
            generated,
            nav_bar_url,
            nav_bar_id,
            logo_url,
            logo_id,
        } = self;
        if let Some(v) = generated {
            slice.generated = v;
        }
        if let Some(v) = nav_bar_url {
            slice.nav_bar_url = v;
        }
        if let Some(v) = nav_bar_id {
            slice.nav_bar_id = v;
        }
        if let Some(v) = logo_url {
            slice.logo_url = v;
        }
        if let Some(v) = logo_id {
            slice.logo_id = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationsUpdate {
    pub integrations: Option<Vec<IntegrationSelection>>,
    pub data_models: Option<Vec<DataModel>>,
}

impl IntegrationsUpdate {
    pub fn apply(self, slice: &mut IntegrationsData) {
        let IntegrationsUpdate {
            integrations,
            data_models,
        } = self;
        if let Some(v) = integrations {
            slice.integrations = v;
        }
        if let Some(v) = data_models {
            slice.data_models = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackagingUpdate {
    pub project_name: Option<String>,
    pub bundle_id: Option<String>,
    pub version_label: Option<String>,
    pub include_test_suite: Option<bool>,
}

impl PackagingUpdate {
    pub fn apply(self, slice: &mut PackagingData) {
        let PackagingUpdate {
            project_name,
            bundle_id,
            version_label,
            include_test_suite,
        } = self;
        if let Some(v) = project_name {
            slice.project_name = v;
        }
        if let Some(v) = bundle_id {
            slice.bundle_id = v;
        }
        if let Some(v) = version_label {
            slice.version_label = v;
        }
        if let Some(v) = include_test_suite {
            slice.include_test_suite = v;
        }
    }
}
