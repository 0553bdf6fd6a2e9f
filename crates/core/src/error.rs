use thiserror::Error;

use crate::field::FieldError;
use crate::model::{CatalogError, ProfileError, QuizError, SessionError};

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
