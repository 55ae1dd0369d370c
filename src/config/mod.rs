// Re-export all items from the submodules
pub mod credentials;
pub mod env_vars;
pub mod prompt;

// Re-export credentials
pub use credentials::{
    MongoCredentials,
    RemoteCredentials,
    validate_uri_options,
};

// Re-export environment toggles
pub use env_vars::{
    debug_logging_requested,
    parse_env_flag,
};

// Re-export prompts
pub use prompt::Prompter;
