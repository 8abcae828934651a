//! Scenario definition loader.
//!
//! A scenario definition file declares which document types a run knows how
//! to validate. Each scenario carries a match rule on the document's root
//! element (local name plus optional default namespace) and may reference a
//! resource inside the configured content repository:
//!
//! ```xml
//! <scenarios>
//!   <scenario name="invoice">
//!     <match root="invoice" namespace="urn:example:invoice"/>
//!     <description>Incoming invoices</description>
//!   </scenario>
//! </scenarios>
//! ```
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use tracing::debug;

/// Errors encountered when loading a scenario definition
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("Missing attribute `{0}` in scenario definition")]
    MissingAttribute(&'static str),
    #[error("Scenario `{0}` has no match rule")]
    MissingMatch(String),
    #[error("No scenarios defined in {0}")]
    NoScenarios(String),
    #[error("Scenario resource `{resource}` not found in repository {repository}")]
    MissingResource { resource: String, repository: String },
}

/// A single validation scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    /// Local name of the document root this scenario matches.
    pub root: String,
    /// Default namespace the document root must carry, if constrained.
    pub namespace: Option<String>,
}

/// The loaded scenario definition plus the optional content repository.
#[derive(Debug, Clone)]
pub struct Scenarios {
    scenarios: Vec<Scenario>,
    pub repository: Option<PathBuf>,
    pub source: PathBuf,
}

impl Scenarios {
    /// Build a scenario set directly, without a definition file.
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self {
            scenarios,
            repository: None,
            source: PathBuf::new(),
        }
    }

    /// Load a scenario definition file, resolving resource references
    /// against `repository` when one is configured.
    pub fn load(definition: &Path, repository: Option<&Path>) -> Result<Self, ScenarioError> {
        let mut reader = Reader::from_file(definition)?;
        reader.trim_text(true);
        let mut buf = Vec::new();

        let mut scenarios: Vec<Scenario> = Vec::new();
        let mut current: Option<Scenario> = None;
        let mut in_description = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    match tag.as_str() {
                        "scenario" => {
                            let name = attr_value(e, "name")?
                                .ok_or(ScenarioError::MissingAttribute("name"))?;
                            current = Some(Scenario {
                                name,
                                description: None,
                                root: String::new(),
                                namespace: None,
                            });
                        }
                        "match" => apply_match(e, current.as_mut(), repository)?,
                        "description" => in_description = current.is_some(),
                        _ => {}
                    }
                }
                Event::Empty(ref e) => {
                    if e.local_name().as_ref() == b"match" {
                        apply_match(e, current.as_mut(), repository)?;
                    }
                }
                Event::Text(e) => {
                    if in_description {
                        if let Some(scenario) = current.as_mut() {
                            scenario.description = Some(e.unescape()?.to_string());
                        }
                    }
                }
                Event::End(ref e) => {
                    let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    match tag.as_str() {
                        "scenario" => {
                            if let Some(scenario) = current.take() {
                                if scenario.root.is_empty() {
                                    return Err(ScenarioError::MissingMatch(scenario.name));
                                }
                                debug!("Loaded scenario `{}`", scenario.name);
                                scenarios.push(scenario);
                            }
                        }
                        "description" => in_description = false,
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if scenarios.is_empty() {
            return Err(ScenarioError::NoScenarios(definition.display().to_string()));
        }

        Ok(Self {
            scenarios,
            repository: repository.map(Path::to_path_buf),
            source: definition.to_path_buf(),
        })
    }

    /// Find the first scenario matching a document root. A scenario without
    /// a namespace constraint matches any root with the same local name.
    pub fn match_root(&self, root: &str, namespace: Option<&str>) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| {
            s.root == root
                && match &s.namespace {
                    Some(ns) => namespace == Some(ns.as_str()),
                    None => true,
                }
        })
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }
}

fn apply_match(
    e: &BytesStart,
    current: Option<&mut Scenario>,
    repository: Option<&Path>,
) -> Result<(), ScenarioError> {
    let Some(scenario) = current else {
        return Ok(());
    };
    scenario.root = attr_value(e, "root")?.ok_or(ScenarioError::MissingAttribute("root"))?;
    scenario.namespace = attr_value(e, "namespace")?;
    if let Some(resource) = attr_value(e, "resource")? {
        if let Some(repository) = repository {
            if !repository.join(&resource).exists() {
                return Err(ScenarioError::MissingResource {
                    resource,
                    repository: repository.display().to_string(),
                });
            }
        }
    }
    Ok(())
}

fn attr_value(e: &BytesStart, name: &str) -> Result<Option<String>, ScenarioError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_definition(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenarios.xml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_scenarios_with_match_rules() {
        let (_dir, path) = write_definition(
            r#"<scenarios>
                 <scenario name="invoice">
                   <match root="invoice" namespace="urn:example:invoice"/>
                   <description>Incoming invoices</description>
                 </scenario>
                 <scenario name="order">
                   <match root="order"/>
                 </scenario>
               </scenarios>"#,
        );

        let scenarios = Scenarios::load(&path, None).unwrap();
        assert_eq!(scenarios.len(), 2);

        let invoice = scenarios
            .match_root("invoice", Some("urn:example:invoice"))
            .unwrap();
        assert_eq!(invoice.name, "invoice");
        assert_eq!(invoice.description.as_deref(), Some("Incoming invoices"));

        // namespace constraint must hold
        assert!(scenarios.match_root("invoice", None).is_none());
        // unconstrained scenario matches any namespace
        assert!(scenarios.match_root("order", Some("urn:other")).is_some());
    }

    #[test]
    fn empty_definition_is_an_error() {
        let (_dir, path) = write_definition("<scenarios></scenarios>");
        assert!(matches!(
            Scenarios::load(&path, None),
            Err(ScenarioError::NoScenarios(_))
        ));
    }

    #[test]
    fn scenario_without_match_is_an_error() {
        let (_dir, path) = write_definition(
            r#"<scenarios><scenario name="broken"></scenario></scenarios>"#,
        );
        assert!(matches!(
            Scenarios::load(&path, None),
            Err(ScenarioError::MissingMatch(name)) if name == "broken"
        ));
    }

    #[test]
    fn missing_repository_resource_is_an_error() {
        let (dir, path) = write_definition(
            r#"<scenarios>
                 <scenario name="invoice">
                   <match root="invoice" resource="invoice.xsd"/>
                 </scenario>
               </scenarios>"#,
        );
        let err = Scenarios::load(&path, Some(dir.path())).unwrap_err();
        assert!(matches!(err, ScenarioError::MissingResource { .. }));

        fs::write(dir.path().join("invoice.xsd"), "<schema/>").unwrap();
        assert!(Scenarios::load(&path, Some(dir.path())).is_ok());
    }

    #[test]
    fn malformed_definition_is_an_error() {
        let (_dir, path) = write_definition("<scenarios><scenario name=");
        assert!(Scenarios::load(&path, None).is_err());
    }
}
