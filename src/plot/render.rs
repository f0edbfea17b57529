//! Render settings, requests and results.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Unit of a plot dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotUnit {
    /// Device-independent pixels.
    #[default]
    Pixels,
    /// Inches.
    Inches,
    /// Centimetres.
    Cm,
}

impl PlotUnit {
    /// Get the wire name of the unit.
    pub fn name(self) -> &'static str {
        match self {
            PlotUnit::Pixels => "pixels",
            PlotUnit::Inches => "inches",
            PlotUnit::Cm => "cm",
        }
    }
}

impl std::str::FromStr for PlotUnit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pixels" | "px" => Ok(PlotUnit::Pixels),
            "inches" | "in" => Ok(PlotUnit::Inches),
            "cm" => Ok(PlotUnit::Cm),
            _ => Err(ParseError::new("plot unit", s)),
        }
    }
}

/// Output format of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// PNG raster image.
    #[default]
    Png,
    /// JPEG raster image.
    Jpeg,
    /// SVG vector image.
    Svg,
    /// PDF document.
    Pdf,
}

impl RenderFormat {
    /// MIME type produced by this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            RenderFormat::Png => "image/png",
            RenderFormat::Jpeg => "image/jpeg",
            RenderFormat::Svg => "image/svg+xml",
            RenderFormat::Pdf => "application/pdf",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            RenderFormat::Png => "png",
            RenderFormat::Jpeg => "jpeg",
            RenderFormat::Svg => "svg",
            RenderFormat::Pdf => "pdf",
        }
    }
}

impl std::str::FromStr for RenderFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(RenderFormat::Png),
            "jpeg" | "jpg" => Ok(RenderFormat::Jpeg),
            "svg" => Ok(RenderFormat::Svg),
            "pdf" => Ok(RenderFormat::Pdf),
            _ => Err(ParseError::new("render format", s)),
        }
    }
}

/// Width and height of a plot in a given unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotSize {
    /// Width value.
    pub width: f64,
    /// Height value.
    pub height: f64,
    /// Unit of measurement.
    pub unit: PlotUnit,
}

impl PlotSize {
    /// Create a size in pixels.
    pub fn pixels(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            unit: PlotUnit::Pixels,
        }
    }
}

/// What the host asks for when it requests a render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRenderSettings {
    /// Target size; the backend picks one when absent.
    pub size: Option<PlotSize>,
    /// Display device pixel ratio.
    pub pixel_ratio: f64,
    /// Output format; PNG when absent.
    pub format: Option<RenderFormat>,
}

impl Default for PlotRenderSettings {
    fn default() -> Self {
        Self {
            size: None,
            pixel_ratio: 1.0,
            format: None,
        }
    }
}

impl PlotRenderSettings {
    /// Set the target size.
    pub fn with_size(mut self, size: PlotSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the pixel ratio.
    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: RenderFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Translate into the parameters forwarded to a render channel.
    pub fn to_request(&self) -> RenderRequest {
        RenderRequest {
            size: self.size,
            pixel_ratio: Some(self.pixel_ratio),
            format: self.format.unwrap_or_default(),
        }
    }
}

/// Parameters of a single backend render call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Requested plot size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<PlotSize>,
    /// Device pixel ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_ratio: Option<f64>,
    /// Output format.
    pub format: RenderFormat,
}

/// Natural plot dimensions as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntrinsicSize {
    /// Plot width.
    pub width: f64,
    /// Plot height.
    pub height: f64,
    /// Dimension unit.
    pub unit: PlotUnit,
    /// Where the size comes from, e.g. the plotting library.
    pub source: String,
}

impl IntrinsicSize {
    /// The intrinsic size as a plain [`PlotSize`].
    pub fn to_size(&self) -> PlotSize {
        PlotSize {
            width: self.width,
            height: self.height,
            unit: self.unit,
        }
    }
}

/// A rendered plot artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPlot {
    /// The request this render answers.
    pub request: RenderRequest,
    /// Base64-encoded payload.
    pub data: String,
    /// Content MIME type.
    pub mime_type: String,
    /// Natural dimensions, when the backend reports them.
    pub intrinsic_size: Option<IntrinsicSize>,
}

impl RenderedPlot {
    /// Format the render was requested in.
    pub fn format(&self) -> RenderFormat {
        self.request.format
    }

    /// Decode the base64 payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.data.as_bytes())
    }

    /// Approximate decoded payload size in bytes.
    pub fn payload_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}
