pub mod binding;
pub mod element;
pub mod entry;
pub mod value_set;

pub use binding::{BindingLocation, BindingStrength, MULTI_BINDING_SEPARATOR, ValueSetSpec};
pub use element::{
    ComplexElement, Element, HL7_NULL, Location, Req, SimpleElement, Usage, is_coded_datatype,
};
pub use entry::{Entry, Trace, VALUE_SET_METADATA_KEY, ValueSetDetails};
pub use value_set::{Code, CodeUsage, Extensibility, Stability, ValueSet};
