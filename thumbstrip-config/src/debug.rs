#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugConfig {
    /// Idle passes to wait for a window surface before giving up on cloning it.
    #[knuffel(child, unwrap(argument), default = Self::default().max_backing_retries)]
    pub max_backing_retries: u32,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            max_backing_retries: 64,
        }
    }
}
