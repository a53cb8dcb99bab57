//! Static annotation policy tables.
//!
//! These are closed allow-lists checked by pure membership. Unknown
//! natural-language documentation keys warn rather than block publication,
//! since new keys are typically forward-compatible.

/// Documentation keys accepted on arguments.
pub static ALLOWED_ARG_METADATA: &[&str] = &["canonical", "prompt"];

/// Documentation keys accepted on queries and actions.
pub static ALLOWED_FUNCTION_METADATA: &[&str] =
    &["canonical", "confirmation", "confirmation_remote", "formatted"];

/// Documentation keys accepted on the class itself.
pub static ALLOWED_CLASS_METADATA: &[&str] =
    &["name", "description", "thingpedia_name", "thingpedia_description"];

/// The closed set of device categories accepted by `#[subcategory]`.
pub static SUBCATEGORIES: &[&str] = &[
    "service",
    "media",
    "social-network",
    "communication",
    "home",
    "health",
    "data-management",
];

/// The closed set of placeholder options (`$name{...}`).
pub static PLACEHOLDER_OPTIONS: &[&str] = &["const", "no-undefined"];

/// Module of the no-op config mixin synthesized for classes that declare none.
pub static DEFAULT_CONFIG_MODULE: &str = "org.thingpedia.config.none";

/// The natural-language tag every dataset must carry.
pub static DATASET_LANGUAGE: &str = "en";
