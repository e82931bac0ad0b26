//! DOM glue: the page bootstrapper and the two element-bound controllers.
//!
//! Everything here follows the same boundary rule: look an element up by its
//! known id, and if it is missing, skip that feature without raising.

pub mod bootstrap;
pub mod scroll_binder;
pub mod waitlist_form;
