pub const GREETING: &str = "Welcome to the data service!";

/// Static confirmation payload; never touches the store.
pub async fn index() -> &'static str {
    GREETING
}
