use clap::Parser;
use std::path::PathBuf;

/// Default data file looked up inside the public directory.
pub const DEFAULT_FILE_NAME: &str = "在仓问题件.xls";

/// Server settings, taken from the command line.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "parcel-triage",
    version,
    about = "Triage held-in-warehouse courier shipments from a spreadsheet"
)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// Directory served under /public; holds the default data file
    #[arg(long, default_value = "public")]
    pub public_dir: PathBuf,

    /// Workbook inside the public directory loaded on startup and on reload
    #[arg(long, default_value = DEFAULT_FILE_NAME)]
    pub default_file: String,
}

impl ServerConfig {
    pub fn default_file_path(&self) -> PathBuf {
        self.public_dir.join(&self.default_file)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "127.0.0.1:3000".to_string(),
            public_dir: PathBuf::from("public"),
            default_file: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

/// Route `log` output through env_logger, `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parser() {
        let parsed = ServerConfig::parse_from(["parcel-triage"]);
        let default = ServerConfig::default();

        assert_eq!(parsed.bind, default.bind);
        assert_eq!(parsed.public_dir, default.public_dir);
        assert_eq!(parsed.default_file, default.default_file);
        assert_eq!(
            parsed.default_file_path(),
            PathBuf::from("public").join("在仓问题件.xls")
        );
    }

    #[test]
    fn test_overrides() {
        let parsed = ServerConfig::parse_from([
            "parcel-triage",
            "--bind",
            "0.0.0.0:8080",
            "--public-dir",
            "/srv/triage",
            "--default-file",
            "held.xlsx",
        ]);

        assert_eq!(parsed.bind, "0.0.0.0:8080");
        assert_eq!(parsed.default_file_path(), PathBuf::from("/srv/triage/held.xlsx"));
    }
}
