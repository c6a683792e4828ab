//! Command-line argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::download::{FeedJob, FriendsJob, DEFAULT_FRIENDS_LOCATION, DEFAULT_PICTURE_NAME};
use crate::error::Result;
use crate::feed::FeedKind;
use crate::template::Template;

/// BeReal login and feed download CLI.
#[derive(Parser, Debug)]
#[command(
    name = "befake",
    version,
    about = "Log in to BeReal and download feeds",
    long_about = "A CLI tool to log in to BeReal with a one-time passcode and download feeds.\n\n\
                  Save locations are path templates such as \"memories/{date}\"."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Session file to read and write.
    #[arg(long = "session-file", env = "BEFAKE_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    /// Base directory for relative save locations.
    #[arg(short = 'd', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Hide progress information.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in with a phone number and a one-time passcode.
    Login {
        /// Phone number in international format, e.g. +33612345678.
        phone_number: String,

        /// Passcode, prompted for when omitted.
        #[arg(long)]
        otp_code: Option<String>,
    },

    /// Refresh the stored session tokens.
    Refresh,

    /// Download a feed.
    Feed(FeedArgs),

    /// Save the friends list with profile pictures.
    Friends(FriendsArgs),
}

#[derive(clap::Args, Debug)]
pub struct FeedArgs {
    /// Feed to download.
    #[arg(value_enum)]
    pub feed: FeedKindArg,

    /// Template for the directory of each post.
    #[arg(long)]
    pub save_location: String,

    /// Template for the path of each (non-instant) realmoji.
    #[arg(long)]
    pub realmoji_location: Option<String>,

    /// Template for the path of each instant realmoji. Defaults to --realmoji-location.
    #[arg(long)]
    pub instant_realmoji_location: Option<String>,

    /// chrono format used for post and realmoji dates.
    #[arg(long)]
    pub date_format: Option<String>,

    /// Keep going with the next item when one item fails.
    #[arg(long)]
    pub continue_on_error: bool,
}

#[derive(clap::Args, Debug)]
pub struct FriendsArgs {
    /// Template for the directory of each friend.
    #[arg(long, default_value = DEFAULT_FRIENDS_LOCATION)]
    pub save_location: String,

    /// Template for the profile picture file name inside that directory.
    #[arg(long, default_value = DEFAULT_PICTURE_NAME)]
    pub picture_name: String,

    /// chrono format used for profile picture dates.
    #[arg(long)]
    pub date_format: Option<String>,

    /// Keep going with the next friend when one fails.
    #[arg(long)]
    pub continue_on_error: bool,
}

/// CLI feed argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedKindArg {
    /// Friends' posts.
    Friends,
    /// Friends' moments, with realmojis.
    FriendsV1,
    /// Posts of friends of friends.
    FriendsOfFriends,
    /// Public discovery posts.
    Discovery,
    /// Your own memories.
    Memories,
    /// Your own memories, legacy listing.
    MemoriesV1,
}

impl From<FeedKindArg> for FeedKind {
    fn from(arg: FeedKindArg) -> Self {
        match arg {
            FeedKindArg::Friends => FeedKind::Friends,
            FeedKindArg::FriendsV1 => FeedKind::FriendsV1,
            FeedKindArg::FriendsOfFriends => FeedKind::FriendsOfFriends,
            FeedKindArg::Discovery => FeedKind::Discovery,
            FeedKindArg::Memories => FeedKind::Memories,
            FeedKindArg::MemoriesV1 => FeedKind::MemoriesV1,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(path) = &self.session_file {
            config.session.path = Some(path.clone());
        }

        if let Some(dir) = &self.directory {
            config.options.base_directory = Some(dir.clone());
        }

        if self.quiet {
            config.options.show_progress = false;
        }

        let (date_format, continue_on_error) = match &self.command {
            Command::Feed(feed) => (&feed.date_format, feed.continue_on_error),
            Command::Friends(friends) => (&friends.date_format, friends.continue_on_error),
            Command::Login { .. } | Command::Refresh => return,
        };

        if let Some(format) = date_format {
            config.options.date_format = format.clone();
        }

        if continue_on_error {
            config.options.continue_on_error = true;
        }
    }
}

impl FeedArgs {
    /// Parse the templates and combine them with the merged configuration.
    pub fn to_job(&self, config: &Config) -> Result<FeedJob> {
        let parse = |source: &Option<String>| source.as_deref().map(Template::parse).transpose();

        Ok(FeedJob {
            kind: self.feed.into(),
            save_location: Template::parse(&self.save_location)?,
            realmoji_location: parse(&self.realmoji_location)?,
            instant_realmoji_location: parse(&self.instant_realmoji_location)?,
            base_directory: config.base_directory(),
            date_format: config.options.date_format.clone(),
            continue_on_error: config.options.continue_on_error,
        })
    }
}

impl FriendsArgs {
    pub fn to_job(&self, config: &Config) -> Result<FriendsJob> {
        Ok(FriendsJob {
            save_location: Template::parse(&self.save_location)?,
            picture_name: Template::parse(&self.picture_name)?,
            base_directory: config.base_directory(),
            date_format: config.options.date_format.clone(),
            continue_on_error: config.options.continue_on_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_command() {
        let args = Args::try_parse_from([
            "befake",
            "feed",
            "friends-v1",
            "--save-location",
            "{user}/{date}",
            "--realmoji-location",
            "rm/{emoji_id}",
            "--continue-on-error",
            "-d",
            "/tmp/out",
        ])
        .unwrap();

        let mut config = Config::default();
        args.merge_into_config(&mut config);
        assert!(config.options.continue_on_error);

        let Command::Feed(feed) = &args.command else {
            panic!("expected feed command");
        };
        let job = feed.to_job(&config).unwrap();
        assert_eq!(job.kind, FeedKind::FriendsV1);
        assert_eq!(job.base_directory, PathBuf::from("/tmp/out"));
        assert!(job.instant_realmoji_location.is_none());
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        let args =
            Args::try_parse_from(["befake", "feed", "memories", "--save-location", "{date"]).unwrap();
        let Command::Feed(feed) = &args.command else {
            panic!("expected feed command");
        };
        assert!(feed.to_job(&Config::default()).is_err());
    }

    #[test]
    fn test_parse_friends_command() {
        let args = Args::try_parse_from([
            "befake",
            "friends",
            "--date-format",
            "%Y%m%d",
            "-d",
            "/tmp/out",
        ])
        .unwrap();

        let mut config = Config::default();
        args.merge_into_config(&mut config);
        assert_eq!(config.options.date_format, "%Y%m%d");
        assert!(!config.options.continue_on_error);

        let Command::Friends(friends) = &args.command else {
            panic!("expected friends command");
        };
        let job = friends.to_job(&config).unwrap();
        assert_eq!(job.save_location.as_str(), DEFAULT_FRIENDS_LOCATION);
        assert_eq!(job.picture_name.as_str(), DEFAULT_PICTURE_NAME);
        assert_eq!(job.date_format, "%Y%m%d");
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_login_requires_phone_number() {
        assert!(Args::try_parse_from(["befake", "login"]).is_err());
        assert!(Args::try_parse_from(["befake", "login", "+33612345678"]).is_ok());
    }
}
