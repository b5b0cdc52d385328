// ABOUTME: Localized display text for workspaces and project kinds
// ABOUTME: Text lookup trait, an in-memory catalog, and the injected enum-to-key tables

use std::collections::HashMap;
use std::sync::Arc;
use trellis_core::{ProjectKind, Workspace};

/// Text lookup by language tag and catalog key
pub trait DisplayLocalizer: Send + Sync {
    fn text(&self, language: &str, key: &str) -> String;
}

/// Static catalog of `language -> key -> text`.
///
/// Resolution order: each tag of an Accept-Language style list (quality
/// values ignored), that tag's primary subtag, then the fallback language.
/// A key missing everywhere renders as itself.
#[derive(Debug, Clone)]
pub struct CatalogLocalizer {
    catalogs: HashMap<String, HashMap<String, String>>,
    fallback_language: String,
}

impl CatalogLocalizer {
    pub fn new(fallback_language: impl Into<String>) -> Self {
        Self {
            catalogs: HashMap::new(),
            fallback_language: normalize_tag(&fallback_language.into()),
        }
    }

    /// Catalog preloaded with English and Simplified Chinese labels
    pub fn with_builtin(fallback_language: impl Into<String>) -> Self {
        let mut localizer = Self::new(fallback_language);
        for (key, en, zh) in [
            ("workspace_dev", "Development", "开发环境"),
            ("workspace_test", "Testing", "测试环境"),
            ("workspace_staging", "Staging", "预发环境"),
            ("workspace_prod", "Production", "生产环境"),
            ("workspace_default", "Default", "默认环境"),
            ("project_type_dop", "DevOps Project", "DevOps 项目"),
            ("project_type_msp", "Microservice Project", "微服务项目"),
        ] {
            localizer.insert("en", key, en);
            localizer.insert("zh", key, zh);
        }
        localizer
    }

    pub fn insert(&mut self, language: &str, key: &str, text: &str) {
        self.catalogs
            .entry(normalize_tag(language))
            .or_default()
            .insert(key.to_string(), text.to_string());
    }

    fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        self.catalogs
            .get(language)
            .and_then(|catalog| catalog.get(key))
            .map(String::as_str)
    }
}

impl DisplayLocalizer for CatalogLocalizer {
    fn text(&self, language: &str, key: &str) -> String {
        for tag in language.split(',') {
            let tag = normalize_tag(tag.split(';').next().unwrap_or_default());
            if tag.is_empty() {
                continue;
            }
            if let Some(text) = self.lookup(&tag, key) {
                return text.to_string();
            }
            if let Some((primary, _)) = tag.split_once('-') {
                if let Some(text) = self.lookup(primary, key) {
                    return text.to_string();
                }
            }
        }

        self.lookup(&self.fallback_language, key)
            .unwrap_or(key)
            .to_string()
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

/// Catalog keys for each workspace and project kind
#[derive(Debug, Clone)]
pub struct DisplayNames {
    pub workspace_keys: HashMap<Workspace, String>,
    pub kind_keys: HashMap<ProjectKind, String>,
}

impl Default for DisplayNames {
    fn default() -> Self {
        let workspace_keys = [
            (Workspace::Dev, "workspace_dev"),
            (Workspace::Test, "workspace_test"),
            (Workspace::Staging, "workspace_staging"),
            (Workspace::Prod, "workspace_prod"),
            (Workspace::Default, "workspace_default"),
        ]
        .into_iter()
        .map(|(workspace, key)| (workspace, key.to_string()))
        .collect();

        let kind_keys = [
            (ProjectKind::Dop, "project_type_dop"),
            (ProjectKind::Msp, "project_type_msp"),
        ]
        .into_iter()
        .map(|(kind, key)| (kind, key.to_string()))
        .collect();

        Self {
            workspace_keys,
            kind_keys,
        }
    }
}

/// Renders workspace and kind labels for one caller language
#[derive(Clone)]
pub struct DisplayText {
    localizer: Arc<dyn DisplayLocalizer>,
    names: DisplayNames,
}

impl DisplayText {
    pub fn new(localizer: Arc<dyn DisplayLocalizer>, names: DisplayNames) -> Self {
        Self { localizer, names }
    }

    /// Raw value without a language, empty for anything but a canonical
    /// workspace name
    pub fn workspace(&self, language: Option<&str>, workspace: &str) -> String {
        let Some(language) = language else {
            return workspace.to_string();
        };
        workspace
            .parse::<Workspace>()
            .ok()
            .filter(|ws| ws.as_str() == workspace)
            .and_then(|ws| self.names.workspace_keys.get(&ws))
            .map(|key| self.localizer.text(language, key))
            .unwrap_or_default()
    }

    /// Raw value without a language, empty for anything but a canonical kind
    pub fn kind(&self, language: Option<&str>, kind: &str) -> String {
        let Some(language) = language else {
            return kind.to_string();
        };
        kind.parse::<ProjectKind>()
            .ok()
            .filter(|k| k.as_str() == kind)
            .and_then(|k| self.names.kind_keys.get(&k))
            .map(|key| self.localizer.text(language, key))
            .unwrap_or_default()
    }
}
