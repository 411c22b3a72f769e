//! URL handling module
//!
//! Profile pages are addressed by substituting a numeric identifier into a
//! fixed URL template such as `https://lpin.ro/sportivi/detalii/{id}`.

mod template;

pub use template::{ProfileUrlTemplate, ID_PLACEHOLDER};
