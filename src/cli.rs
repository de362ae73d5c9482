use std::path::{Path, PathBuf};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Terminal client for saved REST requests", long_about = None)]
struct ClapArgs {
    /// Configuration file. Defaults to $XDG_CONFIG_HOME/courier/config.toml.
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    config: Option<PathBuf>,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    #[cfg(test)]
    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    fn from_clap(args: ClapArgs) -> Self {
        Self {
            config: args.config,
        }
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}
