//! KML overlay documents and the recoloring transform.
//!
//! Modules:
//! - transformer: rewrites per-class placemark colors from a [`crate::settings::SettingsModel`]
//! - events: observation of a transform through [`events::EventSink`]s
//! - location: reads the model location out of a KML document
use std::fs;
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod events;
pub mod location;
pub mod transformer;

pub use transformer::{transform, OverlayTransformer};

/// Namespace of KML 2.2 documents.
pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Media type for serving a transformed overlay.
pub const KML_CONTENT_TYPE: &str = "application/vnd.google-earth.kml+xml";

/// Attribute on `Placemark` elements naming their land-use class.
pub const DEFAULT_CLASS_ATTRIBUTE: &str = "class";

/// Raw bytes of a KML overlay document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayDocument {
    bytes: Vec<u8>,
}

impl OverlayDocument {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Read a template document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(fs::read(path)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for OverlayDocument {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for OverlayDocument {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl AsRef<[u8]> for OverlayDocument {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Configuration for an [`OverlayTransformer`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    /// Namespace URI the `Placemark/Style/PolyStyle/color` elements must be bound to.
    pub namespace: String,
    /// Placemark attribute holding the class identifier.
    pub class_attribute: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            namespace: KML_NAMESPACE.to_owned(),
            class_attribute: DEFAULT_CLASS_ATTRIBUTE.to_owned(),
        }
    }
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace URI of the overlay elements.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the placemark attribute holding the class identifier.
    pub fn with_class_attribute(mut self, class_attribute: impl Into<String>) -> Self {
        self.class_attribute = class_attribute.into();
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.class_attribute.is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "class_attribute must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn document_accessors() {
        let doc = OverlayDocument::from("<kml/>");
        assert_eq!(doc.len(), 6);
        assert!(!doc.is_empty());
        assert_eq!(doc.as_bytes(), b"<kml/>");
        assert_eq!(doc.into_bytes(), b"<kml/>".to_vec());
        assert!(OverlayDocument::default().is_empty());
    }

    #[test]
    fn document_from_path_reads_bytes() {
        let path = std::env::temp_dir().join(format!(
            "runoff_overlay_template_{}.kml",
            std::process::id()
        ));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"<kml></kml>").unwrap();
        drop(file);

        let doc = OverlayDocument::from_path(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(doc.as_bytes(), b"<kml></kml>");
    }

    #[test]
    fn missing_template_is_an_io_error() {
        let err = OverlayDocument::from_path("/definitely/not/here.kml").unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn config_builder_and_validation() {
        let config = TransformConfig::new()
            .with_namespace("urn:test")
            .with_class_attribute("landuse");
        assert_eq!(config.namespace, "urn:test");
        assert_eq!(config.class_attribute, "landuse");
        assert!(config.validate().is_ok());
        assert!(TransformConfig::new()
            .with_class_attribute("")
            .validate()
            .is_err());
    }
}
