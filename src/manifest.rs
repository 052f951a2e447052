//! Facts read from an Android manifest.
//!
//! Only two things are extracted: the protection level of every declared `<permission>` and
//! the `minSdkVersion` of `<uses-sdk>`. The document is read once, on first lookup, and the
//! result is cached. A document that fails to parse is reported as [`Issue::ParseError`] and
//! treated as empty; lookups never fail because of it.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use apiscope::{
//!     diagnostics::Reporter,
//!     manifest::{ManifestFacts, ManifestSource, MinSdkVersion},
//! };
//!
//! let xml = r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android">
//!     <uses-sdk android:minSdkVersion="21"/>
//!     <permission android:name="android.permission.CAMERA"
//!                 android:protectionLevel="dangerous|instant"/>
//! </manifest>"#;
//!
//! let facts = ManifestFacts::new(ManifestSource::Xml(xml.to_string()), Arc::new(Reporter::new()));
//! assert_eq!(facts.min_sdk_version(), MinSdkVersion::Set(21));
//! assert_eq!(
//!     facts.protection_levels("android.permission.CAMERA")?,
//!     ["dangerous", "instant"]
//! );
//! # Ok::<(), apiscope::Error>(())
//! ```

use std::{collections::HashMap, fmt, path::PathBuf, sync::Arc, sync::OnceLock};

use quick_xml::{events::Event, Reader};

use crate::{
    diagnostics::{Issue, Reporter},
    Error, Result,
};

/// Where the manifest comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// No manifest was configured
    None,
    /// A manifest file, read on first lookup
    File(PathBuf),
    /// An in-memory manifest document
    Xml(String),
}

impl ManifestSource {
    fn location(&self) -> String {
        match self {
            ManifestSource::None => String::new(),
            ManifestSource::File(path) => path.display().to_string(),
            ManifestSource::Xml(_) => "<manifest>".to_string(),
        }
    }
}

/// The `minSdkVersion` of a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinSdkVersion {
    /// The manifest declares this minimum API level
    Set(u32),
    /// No manifest, no `<uses-sdk>` element, or an unreadable value
    Unset,
}

impl MinSdkVersion {
    /// The API level, if set
    #[must_use]
    pub fn level(self) -> Option<u32> {
        match self {
            MinSdkVersion::Set(level) => Some(level),
            MinSdkVersion::Unset => None,
        }
    }
}

impl fmt::Display for MinSdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinSdkVersion::Set(level) => write!(f, "{level}"),
            MinSdkVersion::Unset => f.write_str("unset"),
        }
    }
}

#[derive(Debug, Default)]
struct ManifestData {
    permissions: HashMap<String, String>,
    min_sdk_version: Option<u32>,
}

/// Lazily read manifest facts
#[derive(Debug)]
pub struct ManifestFacts {
    source: ManifestSource,
    reporter: Arc<Reporter>,
    data: OnceLock<ManifestData>,
}

impl ManifestFacts {
    /// Creates facts for `source`, reporting parse failures to `reporter`
    #[must_use]
    pub fn new(source: ManifestSource, reporter: Arc<Reporter>) -> Self {
        Self {
            source,
            reporter,
            data: OnceLock::new(),
        }
    }

    /// Returns true if a manifest was configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.source != ManifestSource::None
    }

    /// The protection level declared for `permission`, e.g. `dangerous|instant`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestNotConfigured`] if no manifest was configured.
    pub fn permission_protection_level(&self, permission: &str) -> Result<Option<&str>> {
        Ok(self
            .permission_map()?
            .get(permission)
            .map(String::as_str))
    }

    /// The protection level of `permission` split into its `|` separated parts
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestNotConfigured`] if no manifest was configured.
    pub fn protection_levels(&self, permission: &str) -> Result<Vec<&str>> {
        Ok(self
            .permission_protection_level(permission)?
            .map(|level| {
                level
                    .split('|')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Number of declared permissions
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestNotConfigured`] if no manifest was configured.
    pub fn permissions(&self) -> Result<usize> {
        Ok(self.permission_map()?.len())
    }

    /// The declared `minSdkVersion`; unset without a manifest
    #[must_use]
    pub fn min_sdk_version(&self) -> MinSdkVersion {
        self.data()
            .min_sdk_version
            .map_or(MinSdkVersion::Unset, MinSdkVersion::Set)
    }

    fn permission_map(&self) -> Result<&HashMap<String, String>> {
        if !self.is_configured() {
            return Err(Error::ManifestNotConfigured);
        }
        Ok(&self.data().permissions)
    }

    fn data(&self) -> &ManifestData {
        self.data.get_or_init(|| {
            if !self.is_configured() {
                return ManifestData::default();
            }
            match self.load() {
                Ok(data) => {
                    log::debug!(
                        "read {} permissions from {}",
                        data.permissions.len(),
                        self.source.location()
                    );
                    data
                }
                Err(error) => {
                    let location = self.source.location();
                    log::warn!("failed to read manifest {location}: {error}");
                    self.reporter.report(
                        Issue::ParseError,
                        Some(&location),
                        format!("failed to parse manifest: {error}"),
                    );
                    ManifestData::default()
                }
            }
        })
    }

    fn load(&self) -> Result<ManifestData> {
        match &self.source {
            ManifestSource::None => Ok(ManifestData::default()),
            ManifestSource::File(path) => parse_manifest(&std::fs::read_to_string(path)?),
            ManifestSource::Xml(xml) => parse_manifest(xml),
        }
    }
}

fn parse_manifest(xml: &str) -> Result<ManifestData> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut data = ManifestData::default();
    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                match element.local_name().as_ref() {
                    b"uses-sdk" => {
                        for attribute in element.attributes() {
                            let attribute = attribute?;
                            if attribute.key.local_name().as_ref() == b"minSdkVersion" {
                                let value = attribute
                                    .unescape_value()
                                    .map_err(quick_xml::Error::from)?;
                                data.min_sdk_version = value.trim().parse().ok();
                            }
                        }
                    }
                    b"permission" => {
                        let mut name = None;
                        let mut level = None;
                        for attribute in element.attributes() {
                            let attribute = attribute?;
                            let value = attribute
                                .unescape_value()
                                .map_err(quick_xml::Error::from)?
                                .into_owned();
                            match attribute.key.local_name().as_ref() {
                                b"name" => name = Some(value),
                                b"protectionLevel" => level = Some(value),
                                _ => {}
                            }
                        }
                        let Some(name) = name else {
                            return Err(malformed_error!(
                                "<permission> without a name at byte {}",
                                reader.buffer_position()
                            ));
                        };
                        data.permissions
                            .insert(name, level.unwrap_or_else(|| "normal".to_string()));
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(data)
}
