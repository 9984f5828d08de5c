pub fn config_loaded(name: &str, user: &str) -> String {
    format!("Loaded configuration for {name} (@{user})")
}

pub fn behaviors_loaded(count: usize) -> String {
    format!("Registered {count} search behavior(s)")
}

pub fn store_opened(path: Option<&std::path::Path>) -> String {
    match path {
        Some(path) => format!("Watermark store at {}", path.display()),
        None => "Watermark store is in-memory only".to_string(),
    }
}

pub const CYCLE_START: &str = "starting loop";

pub fn loop_start(name: &str, handle: &str, delay_secs: u64) -> String {
    format!("{name} (@{handle}) entering poll loop, {delay_secs}s between cycles")
}

pub fn results_found(term: &str, count: usize) -> String {
    format!("{count} results for '{term}'")
}

pub fn search_fail(term: &str, err: &str) -> String {
    format!("Search for '{term}' failed, keeping watermark: {err}")
}

pub fn reply_fail(post_id: &str, err: &str) -> String {
    format!("Reply to {post_id} failed, skipping: {err}")
}

pub fn no_responses(term: &str) -> String {
    format!("Behavior '{term}' has no responses, skipping")
}

pub fn watermark_updated(term: &str, id: &str) -> String {
    format!("Watermark for '{term}' is now {id}")
}

pub const CREDENTIALS_RESET: &str = "Credentials changed, dropping existing API client";
pub const API_CONNECTED: &str = "API client constructed";

pub const SHUTDOWN: &str = "Shutting down...";
pub const SHUTDOWN_REQUESTED: &str =
    "Shutdown requested, finishing the current cycle (interrupt again to exit now)";
pub const FORCE_EXIT: &str = "Interrupted again, exiting immediately";

pub fn shutdown_fail(err: &str) -> String {
    format!("Unable to listen for shutdown signal: {err}")
}
