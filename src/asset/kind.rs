//! Asset classes and their fixed defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A configured group of files sharing selection and publish rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Javascripts,
    Stylesheets,
    Images,
    Extras,
}

impl AssetClass {
    /// Publish order. Classes run one after another, never in parallel.
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Javascripts,
        AssetClass::Stylesheets,
        AssetClass::Images,
        AssetClass::Extras,
    ];

    /// Config section name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Javascripts => "javascripts",
            Self::Stylesheets => "stylesheets",
            Self::Images => "images",
            Self::Extras => "extras",
        }
    }

    /// Default remote folder for published objects.
    pub const fn default_folder(self) -> &'static str {
        match self {
            Self::Javascripts => "js",
            Self::Stylesheets => "css",
            Self::Images => "images",
            Self::Extras => "extras",
        }
    }

    pub const fn default_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Javascripts => &["js"],
            Self::Stylesheets => &["css"],
            Self::Images => &["png", "jpg", "jpeg", "gif", "svg", "ico", "webp"],
            Self::Extras => &["otf", "eot", "ttf", "woff", "woff2"],
        }
    }

    /// Bundled classes publish one `{folder}/{fingerprint}.{ext}` artifact.
    /// The others upload every file and a marker object.
    pub const fn bundle_extension(self) -> Option<&'static str> {
        match self {
            Self::Javascripts => Some("js"),
            Self::Stylesheets => Some("css"),
            Self::Images | Self::Extras => None,
        }
    }

    pub const fn is_bundled(self) -> bool {
        self.bundle_extension().is_some()
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "javascripts" | "js" => Ok(Self::Javascripts),
            "stylesheets" | "css" => Ok(Self::Stylesheets),
            "images" | "img" => Ok(Self::Images),
            "extras" => Ok(Self::Extras),
            other => Err(format!("unknown asset class `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("js".parse::<AssetClass>().unwrap(), AssetClass::Javascripts);
        assert_eq!("Stylesheets".parse::<AssetClass>().unwrap(), AssetClass::Stylesheets);
        assert!("fonts".parse::<AssetClass>().is_err());
    }

    #[test]
    fn test_bundled_classes() {
        assert_eq!(AssetClass::Javascripts.bundle_extension(), Some("js"));
        assert!(AssetClass::Stylesheets.is_bundled());
        assert!(!AssetClass::Images.is_bundled());
        assert!(!AssetClass::Extras.is_bundled());
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&AssetClass::Extras).unwrap();
        assert_eq!(json, "\"extras\"");
    }
}
