use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Texture(#[from] texc_api::TexcError),
    #[error("{} is not inside the input directory", .0.display())]
    OutsideInput(PathBuf),
}
