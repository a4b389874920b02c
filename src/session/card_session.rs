use std::time::Duration;

use crate::{
    assets::crop::ProfileImage,
    card::{
        composer::CardComposer,
        config::{CardConfig, CategoryPreset},
    },
    code::style::QrStyle,
    encode::sink::FileSink,
    export::snapshot::{ExportOptions, ExportOutcome, Exporter},
    foundation::error::CardResult,
    scene::model::CardFrame,
};

/// Construction options for a [`CardSession`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSettings {
    /// Styling for the card's QR code.
    pub style: QrStyle,
    /// Snapshot options for the exporter.
    pub export: ExportOptions,
}

/// One user edit. Each replaces the configuration wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardEdit {
    /// Set the display name.
    Name(String),
    /// Set the subtitle.
    Subtitle(String),
    /// Set the destination URL.
    Url(String),
    /// Apply a category preset.
    Category(CategoryPreset),
    /// Raw bytes of an uploaded image; cropped before it is stored.
    UploadAvatar(Vec<u8>),
    /// Drop the avatar.
    RemoveAvatar,
}

/// Top-level controller: owns the live configuration, the composer and the exporter.
pub struct CardSession {
    config: CardConfig,
    composer: CardComposer,
    exporter: Exporter,
    frame: Option<CardFrame>,
    elapsed: Duration,
}

impl CardSession {
    /// Session with the default configuration and an exporter built from `settings`.
    pub fn new(settings: SessionSettings) -> CardResult<Self> {
        let exporter = Exporter::new(settings.export)?;
        Self::with_exporter(settings.style, exporter)
    }

    /// Session around an existing exporter.
    pub fn with_exporter(style: QrStyle, exporter: Exporter) -> CardResult<Self> {
        Ok(Self {
            config: CardConfig::default(),
            composer: CardComposer::new(style)?,
            exporter,
            frame: None,
            elapsed: Duration::ZERO,
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Replace the configuration outright, re-rendering when mounted.
    ///
    /// A configuration the card cannot show is rejected whether or not it is mounted.
    pub fn set_config(&mut self, config: CardConfig) -> CardResult<()> {
        if self.frame.is_some() {
            self.frame = Some(self.composer.compose(&config, self.elapsed)?);
        } else {
            self.composer.check(&config)?;
        }
        self.config = config;
        Ok(())
    }

    /// Apply one edit. On error the previous configuration and frame stay in place.
    #[tracing::instrument(skip(self, edit), fields(edit = edit_kind(&edit)))]
    pub fn apply(&mut self, edit: CardEdit) -> CardResult<()> {
        let next = match edit {
            CardEdit::Name(name) => self.config.with_name(&name),
            CardEdit::Subtitle(subtitle) => self.config.with_subtitle(&subtitle),
            CardEdit::Url(url) => self.config.with_url(&url),
            CardEdit::Category(preset) => self.config.with_category(preset),
            CardEdit::UploadAvatar(bytes) => {
                let image = ProfileImage::from_bytes(&bytes)?;
                self.config.with_profile_image(Some(image))
            }
            CardEdit::RemoveAvatar => self.config.with_profile_image(None),
        };
        self.set_config(next)
    }

    /// Show the card as it looks `elapsed` after appearing on screen.
    pub fn mount(&mut self, elapsed: Duration) -> CardResult<&CardFrame> {
        let frame = self.composer.compose(&self.config, elapsed)?;
        self.elapsed = elapsed;
        Ok(self.frame.insert(frame))
    }

    /// Jump to `elapsed` after mounting. Does nothing while unmounted.
    pub fn advance(&mut self, elapsed: Duration) -> CardResult<()> {
        if self.frame.is_some() {
            self.mount(elapsed)?;
        }
        Ok(())
    }

    /// Mount with every entrance transition already finished.
    pub fn mount_settled(&mut self) -> CardResult<&CardFrame> {
        let settled = self.composer.settle_time();
        self.mount(settled)
    }

    /// Take the card off screen; exports become no-ops.
    pub fn unmount(&mut self) {
        self.frame = None;
    }

    /// Mounted frame, if any.
    pub fn frame(&self) -> Option<&CardFrame> {
        self.frame.as_ref()
    }

    /// The session's exporter.
    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    /// Export the mounted card, named after the current name.
    pub fn export(&self, sink: &mut dyn FileSink) -> CardResult<ExportOutcome> {
        self.exporter.export(self.frame.as_ref(), self.config.name(), sink)
    }
}

fn edit_kind(edit: &CardEdit) -> &'static str {
    match edit {
        CardEdit::Name(_) => "name",
        CardEdit::Subtitle(_) => "subtitle",
        CardEdit::Url(_) => "url",
        CardEdit::Category(_) => "category",
        CardEdit::UploadAvatar(_) => "upload-avatar",
        CardEdit::RemoveAvatar => "remove-avatar",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/card_session.rs"]
mod tests;
