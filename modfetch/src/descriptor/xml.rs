//! `module.xml` parsing.
//!
//! Only the resource list is extracted:
//!
//! ```text
//! <module xmlns="urn:jboss:module:1.0" name="org.example.foo">
//!     <resources>
//!         <resource-root path="foo.jar"/>
//!         <resource-root path="foo-impl.jar">
//!             <filter>...</filter>
//!         </resource-root>
//!     </resources>
//! </module>
//! ```
//!
//! Everything else in the document, including its schema, is ignored.

use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::DescriptorParser;
use crate::error::{ModuleLoadError, ResolverResult};
use crate::identifier::ModuleIdentifier;

const RESOURCES: &[u8] = b"resources";
const RESOURCE_ROOT: &[u8] = b"resource-root";
const PATH_ATTR: &str = "path";

/// Parser for `module.xml` descriptors.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModuleXmlParser;

impl ModuleXmlParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    fn resource_path(
        element: &BytesStart<'_>,
        identifier: &ModuleIdentifier,
    ) -> ResolverResult<String> {
        let attr = element
            .try_get_attribute(PATH_ATTR)
            .map_err(|e| parse_error(identifier, e))?
            .ok_or_else(|| ModuleLoadError::Parse {
                identifier: identifier.clone(),
                reason: "resource-root without a path attribute".to_string(),
            })?;

        let value = attr
            .unescape_value()
            .map_err(|e| parse_error(identifier, e))?;
        Ok(value.into_owned())
    }
}

impl DescriptorParser for ModuleXmlParser {
    fn parse_resource_paths(
        &self,
        reader: &mut dyn Read,
        identifier: &ModuleIdentifier,
    ) -> ResolverResult<Vec<String>> {
        let mut xml = Reader::from_reader(BufReader::new(reader));
        let mut buf = Vec::new();
        let mut paths = Vec::new();
        let mut in_resources = false;
        let mut saw_root = false;

        loop {
            match xml.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    saw_root = true;
                    match e.local_name().as_ref() {
                        RESOURCES => in_resources = true,
                        RESOURCE_ROOT if in_resources => {
                            paths.push(Self::resource_path(e, identifier)?)
                        }
                        _ => {}
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    saw_root = true;
                    if in_resources && e.local_name().as_ref() == RESOURCE_ROOT {
                        paths.push(Self::resource_path(e, identifier)?);
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.local_name().as_ref() == RESOURCES {
                        in_resources = false;
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(parse_error(identifier, e)),
            }
            buf.clear();
        }

        if !saw_root {
            return Err(ModuleLoadError::Parse {
                identifier: identifier.clone(),
                reason: "descriptor has no root element".to_string(),
            });
        }

        Ok(paths)
    }
}

fn parse_error(identifier: &ModuleIdentifier, err: impl std::fmt::Display) -> ModuleLoadError {
    ModuleLoadError::Parse {
        identifier: identifier.clone(),
        reason: err.to_string(),
    }
}
