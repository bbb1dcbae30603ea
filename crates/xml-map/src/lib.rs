//! Dictionary- and attribute-style access over parsed XML trees.
//!
//! [`XmlMap`] wraps one element of a shared document and exposes its
//! children by tag name, either exactly ([`XmlMap::child`]) or through
//! normalized names ([`XmlMap::get_normalized`], [`XmlMap::sget`]) where
//! `offer-id` is reachable as `offer_id`. Leaf text converts through the
//! `to_*` helpers, and subtrees map to and from JSON shapes.
//!
//! ```
//! use xml_map::XmlMap;
//!
//! let xml = r#"<reply>
//!     <status>ok</status>
//!     <cars>
//!         <car id="1">
//!             <brand>BMW</brand>
//!             <capacity units="ccm">3000</capacity>
//!         </car>
//!         <car id="2">
//!             <brand>Audi</brand>
//!             <capacity units="ccm">4000</capacity>
//!         </car>
//!     </cars>
//! </reply>"#;
//!
//! let m = XmlMap::parse(xml)?;
//! assert_eq!(m.get_normalized("status")?.one()?.to_str(), "ok");
//!
//! let cars = m.child("cars")?.one()?.child("car")?.many();
//! assert_eq!(cars.len(), 2);
//! assert_eq!(cars[0].attr("id").as_deref(), Some("1"));
//!
//! let capacity = m.sget("cars.car.1.capacity").and_then(|v| v.one()).unwrap();
//! assert_eq!(capacity.to_int()?, 4000);
//! assert_eq!(capacity.attr("units").as_deref(), Some("ccm"));
//!
//! m.set("status", "queued")?;
//! assert_eq!(m.get_normalized("status")?.one()?.to_str(), "queued");
//! # Ok::<(), xml_map::Error>(())
//! ```
//!
//! Wrappers are cheap handles over one shared tree; mutation through any
//! wrapper is visible to all of them. Use [`XmlMap::deep_clone`] for an
//! independent copy.

pub mod error;
pub mod helpers;

mod dict;
mod node;
mod path;

pub mod value;

pub use error::{Error, Result};
pub use node::{Lookup, Selection, XmlMap};
pub use path::PathValue;
pub use value::{Helper, Value};
pub use xml_map_engine::{Document, NodeId, XmlDecl};
