//! `maven-metadata.xml` parsing for version discovery.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use pomsmith_util::errors::PomsmithError;

/// Artifact-level Maven metadata listing available versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MavenMetadata {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub latest: Option<String>,
    pub release: Option<String>,
    pub versions: Vec<String>,
}

impl MavenMetadata {
    /// Add the versions of `other` that are not listed yet, keeping the
    /// existing order. `latest`/`release` are kept unless missing.
    pub fn merge(&mut self, other: MavenMetadata) {
        for version in other.versions {
            if !self.versions.contains(&version) {
                self.versions.push(version);
            }
        }
        if self.latest.is_none() {
            self.latest = other.latest;
        }
        if self.release.is_none() {
            self.release = other.release;
        }
    }

    /// Render back to a minimal `maven-metadata.xml`.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<metadata>\n");
        let field = |out: &mut String, indent: &str, tag: &str, value: &Option<String>| {
            if let Some(value) = value {
                out.push_str(&format!("{indent}<{tag}>{}</{tag}>\n", escape(value.as_str())));
            }
        };
        field(&mut out, "  ", "groupId", &self.group_id);
        field(&mut out, "  ", "artifactId", &self.artifact_id);
        out.push_str("  <versioning>\n");
        field(&mut out, "    ", "latest", &self.latest);
        field(&mut out, "    ", "release", &self.release);
        out.push_str("    <versions>\n");
        for version in &self.versions {
            out.push_str(&format!("      <version>{}</version>\n", escape(version.as_str())));
        }
        out.push_str("    </versions>\n  </versioning>\n</metadata>\n");
        out
    }
}

/// Parse an artifact-level `maven-metadata.xml` that lists available versions.
pub fn parse_metadata(xml: &str) -> Result<MavenMetadata, PomsmithError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut meta = MavenMetadata::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                text_buf.clear();
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let value = || Some(text_buf.clone());
                match path.join(">").as_str() {
                    "metadata>groupId" => meta.group_id = value(),
                    "metadata>artifactId" => meta.artifact_id = value(),
                    "metadata>versioning>latest" => meta.latest = value(),
                    "metadata>versioning>release" => meta.release = value(),
                    "metadata>versioning>versions>version" if !text_buf.is_empty() => {
                        meta.versions.push(text_buf.clone());
                    }
                    _ => {}
                }
                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PomsmithError::Generic {
                    message: format!("Failed to parse maven-metadata.xml: {e}"),
                });
            }
            _ => {}
        }
    }

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUAVA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>com.google.guava</groupId>
  <artifactId>guava</artifactId>
  <versioning>
    <latest>33.0.0-jre</latest>
    <release>33.0.0-jre</release>
    <versions>
      <version>31.1-jre</version>
      <version>32.1.3-jre</version>
      <version>33.0.0-android</version>
      <version>33.0.0-jre</version>
    </versions>
    <lastUpdated>20231219181425</lastUpdated>
  </versioning>
</metadata>"#;

    #[test]
    fn parse_artifact_metadata() {
        let meta = parse_metadata(GUAVA).unwrap();
        assert_eq!(meta.group_id.as_deref(), Some("com.google.guava"));
        assert_eq!(meta.artifact_id.as_deref(), Some("guava"));
        assert_eq!(meta.release.as_deref(), Some("33.0.0-jre"));
        assert_eq!(meta.versions.len(), 4);
        assert_eq!(meta.versions[0], "31.1-jre");
    }

    #[test]
    fn rendered_metadata_parses_back() {
        let meta = parse_metadata(GUAVA).unwrap();
        assert_eq!(parse_metadata(&meta.to_xml()).unwrap(), meta);
    }

    #[test]
    fn merge_unions_versions() {
        let mut a = MavenMetadata {
            versions: vec!["1.0".into(), "1.1".into()],
            ..Default::default()
        };
        let b = MavenMetadata {
            versions: vec!["1.1".into(), "2.0".into()],
            release: Some("2.0".into()),
            ..Default::default()
        };
        a.merge(b);
        assert_eq!(a.versions, vec!["1.0", "1.1", "2.0"]);
        assert_eq!(a.release.as_deref(), Some("2.0"));
    }

    #[test]
    fn malformed_metadata_is_an_error() {
        assert!(parse_metadata("<metadata><versioning></metadata>").is_err());
    }
}
