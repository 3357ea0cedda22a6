use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `SPARK_LOG_FORMAT` wins; otherwise production (`SPARK_ENV=production`)
    /// logs JSON and everything else logs human-readable lines.
    pub fn resolve(log_format: Option<&str>, env: Option<&str>) -> Self {
        match log_format.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::Json,
            Some("pretty") => Self::Pretty,
            _ if env == Some("production") => Self::Json,
            _ => Self::Pretty,
        }
    }

    fn from_env() -> Self {
        let log_format = std::env::var("SPARK_LOG_FORMAT").ok();
        let env = std::env::var("SPARK_ENV").ok();
        Self::resolve(log_format.as_deref(), env.as_deref())
    }
}

pub fn init_tracing(service_name: &str) {
    let crate_name = service_name.replace('-', "_");
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{crate_name}=debug,spark_shared=debug,tower_http=debug")));

    match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(json_layer)
                .init();
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
        }
    }

    tracing::info!(service = service_name, "tracing initialized");
}
