use thiserror::Error;

/// Errors raised while constructing or operating the plugin.
///
/// Configuration errors surface during construction/setup and abort the host
/// run. Errors inside a detection step never terminate the run: at worst a
/// detector produces an empty result and logs what went wrong.
#[derive(Error, Debug)]
pub enum PluginError {
    /// A configuration value contradicts an implementation constraint.
    #[error("bad value: {0}")]
    BadValue(String),

    /// A combination of configuration entries is unusable.
    #[error("bad parameter: {0}")]
    BadParameter(String),

    /// A configured event name has no registered factory.
    #[error("event '{0}' is not in the registry, please fix or remove")]
    RegistryMiss(String),

    /// A field required by a detector is not offered by the host.
    #[error("field '{0}' is not offered by the model")]
    FieldAbsent(String),

    /// The notification transport failed before yielding a status code.
    #[error("notification transport error: {0}")]
    Notification(#[from] reqwest::Error),

    /// The configuration file could not be read.
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("could not parse configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}
