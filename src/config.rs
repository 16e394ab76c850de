//! Runtime configuration, loaded from the environment via `dotenvy` +
//! `clap(env)`. The teacher's layered `prefer`/`prefer_db` config system is
//! dropped — this system's configuration surface is small and fully
//! enumerated in spec 6, so a plain struct covers it.

use std::time::Duration;

use clap::Args;

/// Environment-backed settings shared by every worker subcommand. Merged
/// with per-command clap flags (batch size, types, etc.) in `cli::run`.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Supabase project URL, used for the Storage REST API.
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Supabase service-role key, used for Storage uploads/downloads.
    #[arg(long, env = "SUPABASE_KEY")]
    pub supabase_key: Option<String>,

    /// Direct Postgres connection string for the Store.
    #[arg(long, env = "SUPABASE_DB_URL")]
    pub database_url: String,

    /// Source identifier this worker process crawls under.
    #[arg(long, env = "SOURCE_ID", default_value = "peraturan-go-id")]
    pub source_id: String,

    /// Permissive TLS for the one government host with intermittent
    /// handshake issues. Never enable against an untrusted host.
    #[arg(long, env = "ALLOW_INSECURE_SSL")]
    pub allow_insecure_ssl: bool,

    /// Poll interval consumed by the external verification reviewer, not by
    /// this worker directly, but carried through the same `.env`.
    #[arg(long, env = "POLL_INTERVAL_SECONDS", default_value = "60")]
    pub poll_interval_seconds: u64,

    /// Confidence threshold consumed by the external verification reviewer.
    #[arg(long, env = "CONFIDENCE_AUTO_APPLY_THRESHOLD", default_value = "0.9")]
    pub confidence_auto_apply_threshold: f64,

    /// Suggestion cap consumed by the external verification reviewer.
    #[arg(long, env = "MAX_SUGGESTIONS_PER_RUN", default_value = "50")]
    pub max_suggestions_per_run: u32,

    /// Local directory used as the per-worker PDF cache.
    #[arg(long, env = "PDF_CACHE_DIR", default_value = "./pdf-cache")]
    pub pdf_cache_dir: std::path::PathBuf,
}

impl Config {
    pub fn detail_page_timeout(&self) -> Duration {
        Duration::from_secs(30)
    }

    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(60)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(500)
    }

    pub fn storage_base_url(&self) -> Option<&str> {
        self.supabase_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn parses_required_database_url_from_env() {
        let cli = TestCli::parse_from(["worker", "--database-url", "postgres://localhost/db"]);
        assert_eq!(cli.config.database_url, "postgres://localhost/db");
        assert_eq!(cli.config.source_id, "peraturan-go-id");
        assert!(!cli.config.allow_insecure_ssl);
    }

    #[test]
    fn timeouts_match_spec_defaults() {
        let cli = TestCli::parse_from(["worker", "--database-url", "postgres://localhost/db"]);
        assert_eq!(cli.config.detail_page_timeout(), Duration::from_secs(30));
        assert_eq!(cli.config.pdf_timeout(), Duration::from_secs(60));
    }
}
