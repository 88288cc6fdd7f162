pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> String;
    fn admin_password(&self) -> String;
    /// When unset the service runs on the in-memory store.
    fn database_url(&self) -> Option<String>;
    /// Spacing of candidate slots, in minutes.
    fn slot_interval_minutes(&self) -> i64;
}
