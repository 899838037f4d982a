#![deny(unsafe_code)]

pub mod annotate;
pub mod extract;
pub mod flatten;
pub mod overrides;
pub mod pattern;
pub mod semantics;

pub use crate::annotate::{Annotation, Annotator, Crosswalk};
pub use crate::extract::{extract_leaves, group_key, group_link, local_key};
pub use crate::flatten::{FlatTree, PATH_SEPARATOR, flatten};
pub use crate::overrides::GroupLinkRewriter;
pub use crate::pattern::{Substitution, compile, substitute};
pub use crate::semantics::{NamespaceMap, resolve_namespaces};
