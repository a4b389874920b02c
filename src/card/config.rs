use std::{fs::File, io::BufReader, path::Path, str::FromStr};

use anyhow::Context as _;

use crate::{
    assets::{crop::ProfileImage, fetch::ImageFetcher, source::resolve_bytes},
    foundation::error::{CardError, CardResult},
};

/// Name shown before the user types one.
pub const DEFAULT_NAME: &str = "MATHAN KUMAR";
/// Subtitle shown before the user types one.
pub const DEFAULT_SUBTITLE: &str = "MEMORIES HUB";
/// Destination encoded before the user enters one.
pub const DEFAULT_URL: &str = "https://photos.app.goo.gl/example";

/// The live card configuration.
///
/// Values are never edited in place: every `with_*` call returns a new configuration, so
/// a reader holding `&CardConfig` always sees one consistent snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardConfig {
    name: String,
    subtitle: String,
    url: String,
    profile_image: Option<ProfileImage>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            url: DEFAULT_URL.to_string(),
            profile_image: None,
        }
    }
}

impl CardConfig {
    /// Configuration without an avatar; name and subtitle are upper-cased.
    pub fn new(name: &str, subtitle: &str, url: &str) -> Self {
        Self {
            name: name.to_uppercase(),
            subtitle: subtitle.to_uppercase(),
            url: url.to_string(),
            profile_image: None,
        }
    }

    /// Upper-cased display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upper-cased subtitle.
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    /// Destination as entered; may be empty.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Cropped avatar, if one was uploaded.
    pub fn profile_image(&self) -> Option<&ProfileImage> {
        self.profile_image.as_ref()
    }

    /// Copy with a new (upper-cased) name.
    pub fn with_name(&self, name: &str) -> Self {
        Self {
            name: name.to_uppercase(),
            ..self.clone()
        }
    }

    /// Copy with a new (upper-cased) subtitle.
    pub fn with_subtitle(&self, subtitle: &str) -> Self {
        Self {
            subtitle: subtitle.to_uppercase(),
            ..self.clone()
        }
    }

    /// Copy with a new destination, stored verbatim.
    pub fn with_url(&self, url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..self.clone()
        }
    }

    /// Copy with the avatar replaced or removed.
    pub fn with_profile_image(&self, image: Option<ProfileImage>) -> Self {
        Self {
            profile_image: image,
            ..self.clone()
        }
    }

    /// Quick category switch: sets the subtitle and, for presets that carry one, the URL.
    pub fn with_category(&self, preset: CategoryPreset) -> Self {
        let next = self.with_subtitle(preset.label());
        match preset.default_url() {
            Some(url) => next.with_url(url),
            None => next,
        }
    }
}

/// Quick-pick categories offered next to the subtitle field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryPreset {
    /// "Memories Hub", keeps the current URL.
    MemoriesHub,
    /// "Google Photos", points at the shared albums root.
    GooglePhotos,
    /// "Portfolio Site", keeps the current URL.
    PortfolioSite,
}

impl CategoryPreset {
    /// Every preset, in menu order.
    pub const ALL: [Self; 3] = [Self::MemoriesHub, Self::GooglePhotos, Self::PortfolioSite];

    /// Subtitle text the preset sets.
    pub fn label(self) -> &'static str {
        match self {
            Self::MemoriesHub => "Memories Hub",
            Self::GooglePhotos => "Google Photos",
            Self::PortfolioSite => "Portfolio Site",
        }
    }

    /// Destination the preset sets, if any.
    pub fn default_url(self) -> Option<&'static str> {
        match self {
            Self::GooglePhotos => Some("https://photos.app.goo.gl/"),
            Self::MemoriesHub | Self::PortfolioSite => None,
        }
    }
}

impl FromStr for CategoryPreset {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|p| {
                p.label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .eq(key.chars())
            })
            .ok_or_else(|| CardError::validation(format!("unknown category '{s}'")))
    }
}

/// On-disk card description consumed by the CLI.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardFile {
    /// Display name.
    pub name: String,
    /// Subtitle line.
    pub subtitle: String,
    /// Destination URL; empty encodes a placeholder.
    pub url: String,
    /// Avatar as a file path, `data:` URI or http(s) URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Preset applied after the fields above.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryPreset>,
}

impl Default for CardFile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            url: DEFAULT_URL.to_string(),
            avatar: None,
            category: None,
        }
    }
}

impl CardFile {
    /// Read a card description from a JSON file.
    pub fn load(path: &Path) -> CardResult<Self> {
        let f = File::open(path).with_context(|| format!("open card '{}'", path.display()))?;
        let card: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse card JSON '{}'", path.display()))?;
        Ok(card)
    }

    /// Build a configuration, loading and cropping the avatar when one is named.
    ///
    /// Relative avatar paths resolve against `base_dir`.
    pub fn to_config(&self, base_dir: &Path, fetcher: &dyn ImageFetcher) -> CardResult<CardConfig> {
        let mut config = CardConfig::new(&self.name, &self.subtitle, &self.url);
        if let Some(preset) = self.category {
            config = config.with_category(preset);
        }
        if let Some(avatar) = self.avatar.as_deref() {
            let source = resolve_avatar_path(avatar, base_dir);
            let bytes = resolve_bytes(&source, fetcher)?;
            config = config.with_profile_image(Some(ProfileImage::from_bytes(&bytes)?));
        }
        Ok(config)
    }
}

fn resolve_avatar_path(avatar: &str, base_dir: &Path) -> String {
    let avatar = avatar.trim();
    let lower = avatar.to_ascii_lowercase();
    if lower.starts_with("data:")
        || lower.starts_with("http://")
        || lower.starts_with("https://")
        || Path::new(avatar).is_absolute()
    {
        return avatar.to_string();
    }
    base_dir.join(avatar).to_string_lossy().into_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/card/config.rs"]
mod tests;
