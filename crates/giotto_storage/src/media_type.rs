//! Media type classification for stored assets.

/// Type of stored asset content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Image content (PNG, JPEG, WebP, etc.)
    Image,
    /// Audio content (MP3, WAV, OGG, etc.)
    Audio,
    /// Structured definition content (assembled cutscenes, JSON)
    Definition,
}

impl MediaType {
    /// Convert to string representation for paths and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Audio => "audio",
            MediaType::Definition => "definition",
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaType::Image),
            "audio" => Ok(MediaType::Audio),
            "definition" => Ok(MediaType::Definition),
            _ => Err(format!("Unknown media type: {}", s)),
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
