//! services/api/src/web/extract.rs
//!
//! A JSON body extractor whose rejection is an `ActionError`, so a body that
//! cannot be parsed fails with the same `{"message"}` shape as any other bad input.

use crate::actions::ActionError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};

pub struct ActionJson<T>(pub T);

impl<S, T> FromRequest<S> for ActionJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ActionError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
