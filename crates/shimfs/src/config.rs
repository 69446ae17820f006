/// Shim configuration, constructor-injected into [`crate::ShimFs`].
#[derive(Debug, Clone)]
pub struct ShimConfig {
    /// Virtual host the asset directory tree is served under.
    pub asset_host: String,
    /// Subdirectory of the base directory pre-listed at bootstrap.
    pub save_subdir: String,
}

impl Default for ShimConfig {
    fn default() -> Self {
        ShimConfig {
            asset_host: "app.assets".to_string(),
            save_subdir: "save".to_string(),
        }
    }
}
