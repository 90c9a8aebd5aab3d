//! Command-line surface for `branford-admin`.

use std::path::PathBuf;

use branford_admin::pipeline::crop::Selection;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "branford-admin", version, about = "Branford content admin client", long_about = None)]
pub struct Cli {
    /// Site base URL, e.g. <https://branfordcrossfit.example>
    #[arg(long, env = "BRANFORD_SITE_URL")]
    pub site: Option<String>,

    /// Admin password from env (no flag, to keep it out of shell history)
    #[arg(hide = true, env = "BRANFORD_ADMIN_PASSWORD")]
    pub password_env: Option<String>,

    /// Session token printed by `login`; skips the password exchange
    #[arg(long, env = "BRANFORD_ADMIN_SESSION", hide_env_values = true)]
    pub session: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and print a session token
    Login,
    /// Upcoming events
    Events(ContentArgs),
    /// Member spotlights
    Spotlights(ContentArgs),
    /// Gallery images
    Gallery(ContentArgs),
    /// Coach profiles
    Coaches(ContentArgs),
    /// Compress, upload and crop an image, then print the value to save
    Image(ImageArgs),
}

impl Commands {
    /// Reads are public; everything else needs an admin session.
    pub fn needs_session(&self) -> bool {
        match self {
            Commands::Login => false,
            Commands::Events(args)
            | Commands::Spotlights(args)
            | Commands::Gallery(args)
            | Commands::Coaches(args) => {
                !matches!(args.action, ContentCmd::List)
            }
            Commands::Image(_) => true,
        }
    }
}

#[derive(Args, Debug)]
pub struct ContentArgs {
    #[command(subcommand)]
    pub action: ContentCmd,
}

#[derive(Subcommand, Debug)]
pub enum ContentCmd {
    /// List the whole collection
    List,
    /// Create a record from a JSON payload
    Create(PayloadArgs),
    /// Apply a partial JSON update to a record
    Update {
        id: Uuid,
        #[command(flatten)]
        payload: PayloadArgs,
    },
    /// Delete a record
    Delete { id: Uuid },
}

#[derive(Args, Debug)]
pub struct PayloadArgs {
    /// Inline JSON payload
    #[arg(long, conflicts_with = "data_file")]
    pub data: Option<String>,
    /// Path to a JSON payload
    #[arg(long)]
    pub data_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Image file to upload
    pub file: PathBuf,
    /// Crop selection as x,y,width,height in image pixels (default: centred square)
    #[arg(long, value_parser = parse_selection)]
    pub crop: Option<Selection>,
}

pub fn parse_selection(raw: &str) -> Result<Selection, String> {
    let parts = raw
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid crop `{raw}`: {e}"))?;
    match parts.as_slice() {
        [x, y, width, height] => Ok(Selection {
            x: *x,
            y: *y,
            width: *width,
            height: *height,
        }),
        _ => Err(format!("invalid crop `{raw}`: expected x,y,width,height")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_argument_parses_four_numbers() {
        assert_eq!(
            parse_selection("10, 20,300,300"),
            Ok(Selection {
                x: 10,
                y: 20,
                width: 300,
                height: 300
            })
        );
        assert!(parse_selection("10,20,300").is_err());
        assert!(parse_selection("a,b,c,d").is_err());
    }

    #[test]
    fn only_listing_skips_the_login() {
        let cli = Cli::try_parse_from(["branford-admin", "events", "list"]).expect("parses");
        assert!(!cli.command.needs_session());

        let cli = Cli::try_parse_from(["branford-admin", "gallery", "delete", &Uuid::nil().to_string()])
            .expect("parses");
        assert!(cli.command.needs_session());

        let cli = Cli::try_parse_from(["branford-admin", "coaches", "list"]).expect("parses");
        assert!(!cli.command.needs_session());

        let cli = Cli::try_parse_from(["branford-admin", "image", "photo.jpg", "--crop", "0,0,200,200"])
            .expect("parses");
        assert!(cli.command.needs_session());
    }

    #[test]
    fn payload_flags_conflict() {
        let result = Cli::try_parse_from([
            "branford-admin",
            "events",
            "create",
            "--data",
            "{}",
            "--data-file",
            "event.json",
        ]);
        assert!(result.is_err());
    }
}
