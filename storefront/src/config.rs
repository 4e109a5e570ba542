use clap::Parser;
use std::path::PathBuf;
use storefront_core::api;

/// A terminal front end for storefront accounts
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Config {
    /// Where the backend lives. Only the protocol and domain, e.g.
    /// `https://backend.example.com`.
    #[clap(long, env = "STOREFRONT_SERVER", default_value = api::DEFAULT_SERVER)]
    pub server: String,

    /// A link to open first, for example the password reset link from an
    /// email (`https://shop.example/user/resetPassword?token=…`) or just a
    /// path like `/user/login`.
    #[clap(long, env = "STOREFRONT_OPEN")]
    pub open: Option<String>,

    /// Where should we write logs?
    #[clap(long, env = "STOREFRONT_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

impl Config {
    /// Get either the configured or a default data directory. If no data
    /// directory can be found (e.g. because `$HOME` is unset) we will use the
    /// current directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("com", "storefront", "storefront")
                    .map(|dirs| dirs.data_local_dir().to_owned())
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_to_the_real_backend() {
        let config = Config::try_parse_from(["storefront"]).unwrap();

        assert_eq!(config.server, api::DEFAULT_SERVER);
        assert_eq!(config.open, None);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let config =
            Config::try_parse_from(["storefront", "--data-dir", "/tmp/storefront"]).unwrap();

        assert_eq!(config.data_dir(), PathBuf::from("/tmp/storefront"));
    }

    #[test]
    fn takes_a_link_to_open() {
        let config = Config::try_parse_from([
            "storefront",
            "--server",
            "http://localhost:4000",
            "--open",
            "/user/resetPassword?token=abc",
        ])
        .unwrap();

        assert_eq!(config.server, "http://localhost:4000");
        assert_eq!(config.open.as_deref(), Some("/user/resetPassword?token=abc"));
    }
}
