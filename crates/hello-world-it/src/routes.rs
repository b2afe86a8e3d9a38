//! Routes the hello-world extension exposes through the host.

pub const HELLO_WORLD_EXTENSION_BASE_URI: &str = "/_extensions/_hello-world";
pub const HELLO_BASE_URI: &str = "/_extensions/_hello-world/hello";
pub const GOODBYE_URI: &str = "/_extensions/_hello-world/goodbye";

/// Route for renaming the world. `name` is inserted verbatim, without URL escaping.
pub fn hello_name_uri(name: &str) -> String {
    format!("{HELLO_BASE_URI}/{name}")
}
