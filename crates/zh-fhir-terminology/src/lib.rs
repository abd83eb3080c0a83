//! Terminology loading and `$expand` over implementation guide definitions.

pub mod error;
pub mod expansion;
pub mod loader;
pub mod model;

pub use error::{Result, TerminologyError};
pub use expansion::TerminologyService;
pub use loader::TerminologyLoader;
pub use model::{
    CodeSystem, Concept, ExpansionContains, ValueSet, ValueSetCompose, ValueSetExpansion,
    ValueSetInclude,
};
