//! Configuration structures for the extraction and rendering pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the ksef pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KsefConfig {
    /// XML extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF rendering configuration.
    pub render: RenderConfig,
}

/// XML extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of XML nodes accepted in one document.
    pub nodes_limit: u32,

    /// Currency used when the document does not state one.
    pub default_currency: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            nodes_limit: 1_000_000,
            default_currency: "PLN".to_string(),
        }
    }
}

/// PDF rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Longest line-item description printed, ellipsis included.
    pub description_max_chars: usize,

    /// Cursor position (mm from the top edge) past which the line-item
    /// table continues on a new page.
    pub table_break_y_mm: f32,

    /// Attribution line printed under the footer block.
    pub watermark: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            description_max_chars: 55,
            table_break_y_mm: 260.0,
            watermark: "Wygenerowano z danych KSeF | ksef-pdf".to_string(),
        }
    }
}

impl KsefConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
