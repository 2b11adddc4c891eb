//! Message element tree consumed by the value set validators.
//!
//! The tree is built elsewhere; this module only models what the validators
//! read from it: positions, locations, profile requirements and raw values.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use super::binding::ValueSetSpec;
use crate::error::{ConformanceError, Result};

static CODED_ELEMENT_DATATYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^C(W|N)?E$").unwrap());

/// The HL7 v2 explicit null, two double quotes.
pub const HL7_NULL: &str = "\"\"";

/// Returns true for the coded element datatypes (CE, CNE, CWE).
pub fn is_coded_datatype(datatype: &str) -> bool {
    CODED_ELEMENT_DATATYPE.is_match(datatype)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Location {
    pub description: String,
    pub path: String,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(
        path: impl Into<String>,
        description: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            description: description.into(),
            path: path.into(),
            line,
            column,
        }
    }

    pub fn pretty(&self) -> String {
        if self.description.is_empty() {
            self.path.clone()
        } else {
            format!("{} ({})", self.path, self.description)
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Usage {
    R,
    RE,
    #[default]
    O,
    C,
    X,
    W,
}

/// Profile requirement attached to an element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Req {
    pub usage: Usage,
    #[serde(default)]
    pub vs_specs: Vec<ValueSetSpec>,
}

impl Req {
    pub fn new(usage: Usage) -> Self {
        Self {
            usage,
            vs_specs: Vec::new(),
        }
    }

    pub fn with_spec(mut self, spec: ValueSetSpec) -> Self {
        self.vs_specs.push(spec);
        self
    }

    /// The governing binding; only the first declared spec is enforced.
    pub fn spec(&self) -> Option<&ValueSetSpec> {
        self.vs_specs.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimpleElement {
    pub position: u32,
    pub instance: u32,
    pub location: Location,
    pub req: Req,
    pub value: String,
}

impl SimpleElement {
    pub fn new(position: u32, location: Location, value: impl Into<String>) -> Self {
        Self {
            position,
            instance: 1,
            location,
            req: Req::default(),
            value: value.into(),
        }
    }

    pub fn with_req(mut self, req: Req) -> Self {
        self.req = req;
        self
    }

    pub fn with_instance(mut self, instance: u32) -> Self {
        self.instance = instance;
        self
    }

    pub fn is_null(&self) -> bool {
        self.value == HL7_NULL
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplexElement {
    pub position: u32,
    pub instance: u32,
    pub location: Location,
    pub req: Req,
    #[serde(default)]
    pub datatype: Option<String>,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl ComplexElement {
    pub fn new(position: u32, location: Location) -> Self {
        Self {
            position,
            instance: 1,
            location,
            req: Req::default(),
            datatype: None,
            children: Vec::new(),
        }
    }

    pub fn with_req(mut self, req: Req) -> Self {
        self.req = req;
        self
    }

    pub fn with_instance(mut self, instance: u32) -> Self {
        self.instance = instance;
        self
    }

    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn is_coded_element(&self) -> bool {
        self.datatype.as_deref().is_some_and(is_coded_datatype)
    }

    /// Resolves the first instance of the child at `position`, which must be
    /// a single simple element.
    pub fn query_simple(&self, position: u32) -> Result<&SimpleElement> {
        let matches: Vec<&Element> = self
            .children
            .iter()
            .filter(|c| c.position() == position && c.instance() == 1)
            .collect();

        let details = match matches.as_slice() {
            [only] => match *only {
                Element::Simple(simple) => return Ok(simple),
                Element::Complex(_) => format!(
                    "Querying {} for the position '{}' returned a complex element",
                    self.location.pretty(),
                    position
                ),
            },
            _ => format!(
                "Querying {} for the position '{}' returned {} element(s)",
                self.location.pretty(),
                position,
                matches.len()
            ),
        };

        Err(ConformanceError::binding_location(format!(
            "An error occurred while resolving the binding location. Detail: {details}"
        )))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Simple(SimpleElement),
    Complex(ComplexElement),
}

impl Element {
    pub fn position(&self) -> u32 {
        match self {
            Self::Simple(s) => s.position,
            Self::Complex(c) => c.position,
        }
    }

    pub fn instance(&self) -> u32 {
        match self {
            Self::Simple(s) => s.instance,
            Self::Complex(c) => c.instance,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Self::Simple(s) => &s.location,
            Self::Complex(c) => &c.location,
        }
    }

    pub fn req(&self) -> &Req {
        match self {
            Self::Simple(s) => &s.req,
            Self::Complex(c) => &c.req,
        }
    }

    pub fn children(&self) -> &[Element] {
        match self {
            Self::Simple(_) => &[],
            Self::Complex(c) => &c.children,
        }
    }
}

impl From<SimpleElement> for Element {
    fn from(element: SimpleElement) -> Self {
        Self::Simple(element)
    }
}

impl From<ComplexElement> for Element {
    fn from(element: ComplexElement) -> Self {
        Self::Complex(element)
    }
}
