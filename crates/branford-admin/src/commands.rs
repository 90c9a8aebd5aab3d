use branford_admin::client::{ApiClient, ClientError};
use branford_admin::pipeline::PipelineError;
use branford_admin::pipeline::field::ImageField;
use branford_admin::pipeline::intake::SelectedFile;
use branford_admin::store::{CollectionStore, ContentResource, LoadState};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::args::{Cli, ContentCmd, ImageArgs};
use crate::io::{print_json, read_payload};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("site URL is required (use --site or BRANFORD_SITE_URL)")]
    MissingSite,
    #[error("admin password is required (set BRANFORD_ADMIN_PASSWORD)")]
    MissingPassword,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Build a client, reusing `--session` or logging in with the password.
pub async fn build_client(cli: &Cli, require_session: bool) -> Result<ApiClient, CliError> {
    let site = cli.site.as_deref().ok_or(CliError::MissingSite)?;
    let mut client = ApiClient::new(site)?;

    if let Some(token) = &cli.session {
        return Ok(client.with_session(token.clone()));
    }
    if !require_session {
        return Ok(client);
    }

    let password = cli.password_env.as_deref().ok_or(CliError::MissingPassword)?;
    client.login(password).await?;
    Ok(client)
}

pub async fn login(mut client: ApiClient, password: Option<&str>) -> Result<(), CliError> {
    let password = password.ok_or(CliError::MissingPassword)?;
    let token = client.login(password).await?;
    println!("{token}");
    Ok(())
}

pub async fn content<R>(client: ApiClient, cmd: ContentCmd) -> Result<(), CliError>
where
    R: ContentResource,
    R::Input: DeserializeOwned,
    R::Patch: DeserializeOwned,
{
    match cmd {
        ContentCmd::List => {
            let store = CollectionStore::<R>::mount(client).await;
            if let LoadState::Failed(message) = store.state() {
                return Err(CliError::InvalidInput(message.clone()));
            }
            print_json(&store.items())
        }
        ContentCmd::Create(payload) => {
            let input: R::Input = read_payload(payload.data, payload.data_file)?;
            let record = CollectionStore::<R>::new(client).create(&input).await?;
            print_json(&record)
        }
        ContentCmd::Update { id, payload } => {
            let patch: R::Patch = read_payload(payload.data, payload.data_file)?;
            let record = CollectionStore::<R>::new(client).update(id, patch).await?;
            print_json(&record)
        }
        ContentCmd::Delete { id } => {
            CollectionStore::<R>::new(client).delete(id).await?;
            println!("deleted");
            Ok(())
        }
    }
}

pub async fn image(client: ApiClient, args: ImageArgs) -> Result<(), CliError> {
    let file = SelectedFile::from_path(&args.file).await?;
    let mut field = ImageField::default();

    field.upload(&client, vec![file]).await?;
    if let Some(image) = field.working_image() {
        eprintln!("uploaded {}", image.url);
    }

    field.begin_crop(None)?;
    if let Some(selection) = args.crop {
        field.adjust(selection)?;
    }
    let value = field.commit_crop_in_background().await?;
    println!("{value}");
    Ok(())
}
