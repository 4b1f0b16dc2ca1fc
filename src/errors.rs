#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Header name or value rejected by the setter.
    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Proxy URL failed to parse when it was configured.
    #[error("invalid proxy URL `{url}`: {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// `init()` was called after `disable()` tore the client layer down.
    #[error("client layer has been shut down")]
    ClientShutDown,
}
