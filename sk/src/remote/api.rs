//! Endpoint bases and paths for the OpenAI-compatible HTTP APIs

/// Default OpenAI API base
pub const OPENAI_BASE: &str = "https://api.openai.com/";

/// Chat completions path, relative to the base
pub const CHAT_COMPLETIONS: &str = "v1/chat/completions";

/// Models listing path, relative to the base
pub const MODELS: &str = "v1/models";

/// Azure endpoint base for a resource
pub fn azure_base(resource: &str) -> String {
    format!("https://{}.openai.azure.com/", resource)
}

/// Azure chat completions path for a deployment, relative to the base
pub fn azure_chat_completions(deployment: &str) -> String {
    format!("openai/deployments/{}/chat/completions", deployment)
}

/// Join a base URL and a relative path
///
/// Configured base overrides may or may not carry a trailing slash.
pub fn join_url(base: &str, path: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
