/// How log events are filtered and rendered.
#[derive(Debug, Clone)]
pub struct Config {
    /// Filter directives, see
    /// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
    pub(crate) env_filter: String,
    /// Render events as one JSON object per line.
    pub(crate) use_json_format: bool,
}

impl Config {
    pub fn new(env_filter: &str) -> Self {
        Self {
            env_filter: env_filter.to_owned(),
            use_json_format: false,
        }
    }

    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.use_json_format = enabled;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("warn")
    }
}
