//! # xsdgen content model engine
//!
//! Compiles XML Schema content models into generation plans and provides
//! the runtime containers generated data types delegate to.
//!
//! Three components cooperate:
//!
//! - [`schema::graph::SchemaGraph`] loads schema documents, follows imports
//!   and resolves qualified references (`type=`, `ref=`, `base=`,
//!   `substitutionGroup`, attribute groups) across namespaces;
//! - [`compiler::Compiler`] turns each resolved structural type into a
//!   memoized [`compiler::plan::CompiledPlan`]: property list, validation
//!   obligations and serialization steps;
//! - [`runtime`] hosts the `Sequence` / `Choice` / `Collection` containers
//!   that accept insertions in any order and reproduce schema-ordered
//!   output, searching nested structures for a free slot.
//!
//! ## Example
//!
//! ```
//! use xsdgen::schema::graph::{MapSource, SchemaGraph};
//! use xsdgen::compiler::Compiler;
//!
//! let text = r#"<schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
//!                       targetNamespace="http://example.com/ns">
//!     <complexType name="Invoice">
//!       <sequence>
//!         <element name="total" type="xs:decimal"/>
//!         <element name="line" type="xs:string" maxOccurs="unbounded"/>
//!       </sequence>
//!     </complexType>
//! </schema>"#;
//!
//! let mut graph = SchemaGraph::new();
//! graph.load_str(text, &MapSource::new())?;
//!
//! let compiler = Compiler::new(&graph);
//! let id = graph.type_id(Some("http://example.com/ns"), "Invoice").unwrap();
//! let plan = compiler.compile(id)?;
//! assert!(plan.property("lines").unwrap().is_collection());
//! # Ok::<(), xsdgen::Error>(())
//! ```

pub mod compiler;
pub mod documents;
pub mod error;
pub mod names;
pub mod namespaces;
pub mod runtime;
pub mod schema;

pub use error::{Error, InvalidSchema, Result, UnresolvedReference};
pub use namespaces::QName;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
