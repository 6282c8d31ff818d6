//! Configuration types for the framebuffer engine.

use crate::errors::FramebufferError;
use rfb_encodings::Encoding;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Complete engine configuration.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Decoding settings.
    #[serde(default)]
    pub decoding: DecodingConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Decoding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodingConfig {
    /// Pixel-carrying encodings the processor accepts, in preference order.
    #[serde(default = "default_encodings")]
    pub encodings: Vec<Encoding>,
    /// Honour the DesktopSize pseudo-encoding.
    #[serde(default = "default_true")]
    pub desktop_resize: bool,
    /// Largest width a DesktopSize rectangle may request.
    #[serde(default = "default_max_dimension")]
    pub max_width: u16,
    /// Largest height a DesktopSize rectangle may request.
    #[serde(default = "default_max_dimension")]
    pub max_height: u16,
    /// Hexdump every rectangle payload on the `protocol_trace` target.
    #[serde(default)]
    pub trace_payloads: bool,
    /// Capacity of the snapshot queue used by `QueuedObserver`.
    #[serde(default = "default_observer_queue_depth")]
    pub observer_queue_depth: usize,
}

fn default_encodings() -> Vec<Encoding> {
    vec![
        Encoding::Hextile,
        Encoding::Rre,
        Encoding::CopyRect,
        Encoding::Raw,
    ]
}

fn default_true() -> bool {
    true
}

fn default_max_dimension() -> u16 {
    8192
}

fn default_observer_queue_depth() -> usize {
    4
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self {
            encodings: default_encodings(),
            desktop_resize: default_true(),
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            trace_payloads: false,
            observer_queue_depth: default_observer_queue_depth(),
        }
    }
}

impl DecodingConfig {
    /// Returns true if rectangles in `encoding` should be decoded.
    #[must_use]
    pub fn is_enabled(&self, encoding: Encoding) -> bool {
        match encoding {
            Encoding::DesktopSize => self.desktop_resize,
            Encoding::LastRect => true,
            other => self.encodings.contains(&other),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber` filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, FramebufferError> {
        let config: Config = toml::from_str(text)
            .map_err(|e| FramebufferError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FramebufferError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            FramebufferError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), FramebufferError> {
        // Validate encodings
        if self.decoding.encodings.is_empty() {
            return Err(FramebufferError::Config(
                "At least one encoding must be specified".to_string(),
            ));
        }
        if let Some(pseudo) = self.decoding.encodings.iter().find(|e| e.is_pseudo()) {
            return Err(FramebufferError::Config(format!(
                "{} is a pseudo-encoding and cannot be listed in decoding.encodings",
                pseudo
            )));
        }

        // Validate size limits
        if self.decoding.max_width == 0 || self.decoding.max_height == 0 {
            return Err(FramebufferError::Config(
                "Maximum desktop size must be non-zero".to_string(),
            ));
        }

        if self.decoding.observer_queue_depth == 0 {
            return Err(FramebufferError::Config(
                "Observer queue depth must be at least 1".to_string(),
            ));
        }

        EnvFilter::try_new(&self.logging.filter).map_err(|e| {
            FramebufferError::Config(format!(
                "invalid log filter {:?}: {}",
                self.logging.filter, e
            ))
        })?;

        Ok(())
    }
}

/// Builder for creating a `Config`.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the accepted encodings.
    #[must_use]
    pub fn encodings(mut self, encodings: impl IntoIterator<Item = Encoding>) -> Self {
        self.config.decoding.encodings = encodings.into_iter().collect();
        self
    }

    /// Enables or disables the DesktopSize pseudo-encoding.
    #[must_use]
    pub fn desktop_resize(mut self, enabled: bool) -> Self {
        self.config.decoding.desktop_resize = enabled;
        self
    }

    /// Sets the largest desktop size a server may request.
    #[must_use]
    pub fn max_desktop_size(mut self, width: u16, height: u16) -> Self {
        self.config.decoding.max_width = width;
        self.config.decoding.max_height = height;
        self
    }

    /// Enables payload hexdumps.
    #[must_use]
    pub fn trace_payloads(mut self, enabled: bool) -> Self {
        self.config.decoding.trace_payloads = enabled;
        self
    }

    /// Sets the snapshot queue capacity.
    #[must_use]
    pub fn observer_queue_depth(mut self, depth: usize) -> Self {
        self.config.decoding.observer_queue_depth = depth;
        self
    }

    /// Sets the default log filter.
    #[must_use]
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.logging.filter = filter.into();
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Config, FramebufferError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Installs a global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config.filter`. Fails if a subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), FramebufferError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            FramebufferError::Config(format!("invalid log filter {:?}: {}", config.filter, e))
        })?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| FramebufferError::Config(format!("failed to install logger: {}", e)))
}
