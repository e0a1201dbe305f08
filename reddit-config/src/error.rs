//! Configuration errors.

/// Errors from loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting has no value in any source.
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    /// A setting has a value that cannot be used.
    #[error("invalid setting {name}: {reason}")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A source could not be read or merged.
    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),
}
