//! Source descriptors: where a batch of brand mentions lives and how it is shaped.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Declared shape of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Delimited rows with a header line.
    #[serde(alias = "csv")]
    Tabular,
    /// A JSON array of flat objects, or a single (possibly nested) object.
    #[serde(alias = "json")]
    FlatHierarchical,
    /// The vendor mention API export: `{"documents": [...]}` or a bare array.
    #[serde(alias = "meltwater")]
    NestedVendor,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Tabular => write!(f, "tabular"),
            SourceFormat::FlatHierarchical => write!(f, "flat-hierarchical"),
            SourceFormat::NestedVendor => write!(f, "nested-vendor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub location: PathBuf,
    pub format: SourceFormat,
    #[serde(default)]
    pub brand: Option<String>,
}

impl SourceDescriptor {
    #[must_use]
    pub fn new(location: impl Into<PathBuf>, format: SourceFormat, brand: Option<&str>) -> Self {
        Self {
            location: location.into(),
            format,
            brand: brand.map(ToString::to_string),
        }
    }

    /// The configured brand, ignoring blank values.
    #[must_use]
    pub fn configured_brand(&self) -> Option<&str> {
        self.brand
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }

    /// Brand guessed from the file name.
    ///
    /// `"Lockheed Martin - Export.csv"` yields `"Lockheed Martin"`; a stem
    /// without the `" - "` separator is used whole.
    #[must_use]
    pub fn filename_brand(&self) -> Option<String> {
        let stem = self.location.file_stem()?.to_str()?;
        let guess = stem.split(" - ").next().unwrap_or(stem).trim();
        if guess.is_empty() {
            None
        } else {
            Some(guess.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceDescriptor>,
}

/// Load and validate the source list from a YAML file.
///
/// Relative `location`s are resolved against the directory holding the file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut sources_file: SourcesFile = serde_yaml::from_str(&content)?;

    validate_sources(&sources_file)?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for source in &mut sources_file.sources {
        if source.location.is_relative() {
            source.location = base.join(&source.location);
        }
    }

    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    for (idx, source) in sources_file.sources.iter().enumerate() {
        if source.location.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!(
                "source #{} has an empty location",
                idx + 1
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_brand_takes_segment_before_separator() {
        let source = SourceDescriptor::new(
            "data/csv/Lockheed Martin - Lockheed Martin.csv",
            SourceFormat::Tabular,
            None,
        );
        assert_eq!(source.filename_brand().as_deref(), Some("Lockheed Martin"));
    }

    #[test]
    fn filename_brand_uses_whole_stem_without_separator() {
        let source =
            SourceDescriptor::new("data/json/nike_sample.json", SourceFormat::FlatHierarchical, None);
        assert_eq!(source.filename_brand().as_deref(), Some("nike_sample"));
    }

    #[test]
    fn filename_brand_splits_on_spaced_dash_only() {
        let source = SourceDescriptor::new("Coca-Cola.json", SourceFormat::NestedVendor, None);
        assert_eq!(source.filename_brand().as_deref(), Some("Coca-Cola"));
    }

    #[test]
    fn configured_brand_ignores_blank() {
        let source = SourceDescriptor::new("a.csv", SourceFormat::Tabular, Some("   "));
        assert!(source.configured_brand().is_none());
    }

    #[test]
    fn format_accepts_legacy_aliases() {
        let yaml = "sources:\n  - { location: a.csv, format: csv }\n  - { location: b.json, format: json }\n  - { location: c.json, format: meltwater, brand: Coca-Cola }\n";
        let file: SourcesFile = serde_yaml::from_str(yaml).unwrap();
        let formats: Vec<SourceFormat> = file.sources.iter().map(|s| s.format).collect();
        assert_eq!(
            formats,
            vec![
                SourceFormat::Tabular,
                SourceFormat::FlatHierarchical,
                SourceFormat::NestedVendor
            ]
        );
        assert_eq!(file.sources[2].brand.as_deref(), Some("Coca-Cola"));
    }

    #[test]
    fn format_rejects_unknown_value() {
        let yaml = "sources:\n  - { location: a.xml, format: xml }\n";
        assert!(serde_yaml::from_str::<SourcesFile>(yaml).is_err());
    }

    #[test]
    fn blank_brand_is_accepted_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.yaml");
        std::fs::write(
            &path,
            "sources:\n  - location: Acme - export.csv\n    format: tabular\n    brand: \"\"\n  - location: b.csv\n    format: tabular\n    brand: Globex\n",
        )
        .unwrap();

        let file = load_sources(&path).unwrap();
        assert_eq!(file.sources.len(), 2);
        assert!(file.sources[0].configured_brand().is_none());
        assert_eq!(file.sources[0].filename_brand().as_deref(), Some("Acme"));
        assert_eq!(file.sources[1].configured_brand(), Some("Globex"));
    }

    #[test]
    fn validate_rejects_empty_location() {
        let file = SourcesFile {
            sources: vec![SourceDescriptor::new("", SourceFormat::Tabular, None)],
        };
        let err = validate_sources(&file).unwrap_err();
        assert!(err.to_string().contains("empty location"));
    }

    #[test]
    fn load_sources_resolves_relative_locations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.yaml");
        std::fs::write(
            &path,
            "sources:\n  - location: data/x.csv\n    format: tabular\n    brand: X\n  - location: /abs/y.json\n    format: nested-vendor\n",
        )
        .unwrap();

        let file = load_sources(&path).unwrap();
        assert_eq!(file.sources[0].location, dir.path().join("data/x.csv"));
        assert_eq!(file.sources[1].location, PathBuf::from("/abs/y.json"));
        assert!(file.sources[1].brand.is_none());
    }

    #[test]
    fn load_sources_reports_missing_file() {
        let err = load_sources(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::SourcesFileIo { .. }));
    }
}
