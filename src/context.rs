use actix_web::{self, FromRequest, HttpMessage};
use std::future::{ready, Ready};

use crate::error::Error;

pub static ADMINISTRATOR_ROLE: &str = "Administrator";

/// Authenticated caller identity, put into request extensions by the jwt
/// middleware.
#[derive(Debug, Clone)]
pub struct AdminInfo {
    pub id: i32,
    pub role: String,
}

impl AdminInfo {
    pub fn ensure_administrator(&self) -> Result<(), Error> {
        if self.role != ADMINISTRATOR_ROLE {
            return Err(Error::Forbidden(format!("administrator role required(role: {})", self.role)));
        }
        Ok(())
    }
}

impl FromRequest for AdminInfo {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(admin) = req.extensions().get::<Self>() {
            ready(Ok(admin.clone()))
        } else {
            ready(Err(actix_web::error::ErrorUnauthorized("")))
        }
    }
}
