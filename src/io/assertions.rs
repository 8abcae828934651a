//! Assertions file loader.
//!
//! An assertions file records the expected validation outcome per target,
//! keyed by file name:
//!
//! ```xml
//! <assertions>
//!   <assertion target="invoice-42.xml" expect="accept"/>
//!   <assertion target="broken.xml" expect="reject"/>
//! </assertions>
//! ```
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssertionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("Missing attribute `{0}` in assertions file")]
    MissingAttribute(&'static str),
    #[error("Unknown expectation `{0}`, must be `accept` or `reject`")]
    UnknownExpectation(String),
}

/// Expected outcome for one target.
#[derive(Debug, Clone)]
pub struct Assertion {
    pub target: String,
    pub accept: bool,
}

/// All assertions loaded from one file.
#[derive(Debug, Clone)]
pub struct Assertions {
    entries: Vec<Assertion>,
    pub source: PathBuf,
}

impl Assertions {
    pub fn load(path: &Path) -> Result<Self, AssertionError> {
        let mut reader = Reader::from_file(path)?;
        reader.trim_text(true);
        let mut buf = Vec::new();
        let mut entries = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if e.local_name().as_ref() == b"assertion" {
                        entries.push(parse_assertion(e)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self {
            entries,
            source: path.to_path_buf(),
        })
    }

    /// Look up the assertion recorded for a target file name.
    pub fn for_target(&self, name: &str) -> Option<&Assertion> {
        self.entries.iter().find(|a| a.target == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_assertion(e: &BytesStart) -> Result<Assertion, AssertionError> {
    let mut target = None;
    let mut expect = None;
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"target" => target = Some(attr.unescape_value()?.to_string()),
            b"expect" => expect = Some(attr.unescape_value()?.to_string()),
            _ => {}
        }
    }
    let target = target.ok_or(AssertionError::MissingAttribute("target"))?;
    let expect = expect.ok_or(AssertionError::MissingAttribute("expect"))?;
    let accept = match expect.as_str() {
        "accept" => true,
        "reject" => false,
        other => return Err(AssertionError::UnknownExpectation(other.to_string())),
    };
    Ok(Assertion { target, accept })
}
