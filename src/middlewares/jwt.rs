use actix_web::dev::{Service, ServiceRequest, Transform};
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, HttpMessage};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Future, Ready};
use std::pin::Pin;

use crate::context::AdminInfo;

pub static JWT_SECRET: &str = "JWT_SECRET";

#[derive(Debug, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub role: String,
    pub exp: i64,
}

pub struct Jwt {
    secret: Vec<u8>,
}

impl Jwt {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S> Transform<S, ServiceRequest> for Jwt
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Response = S::Response;
    type Error = Error;
    type Transform = JwtService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtService {
            secret: self.secret.clone(),
            next_service: service,
        }))
    }
}

pub struct JwtService<S> {
    secret: Vec<u8>,
    next_service: S,
}

impl<S> Service<ServiceRequest> for JwtService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Response = S::Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    fn poll_ready(&self, ctx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header = match req.headers().get("Authorization") {
            None => return Box::pin(async move { Err(ErrorUnauthorized("no token in header")) }),
            Some(header) => header.to_owned(),
        };
        let token = match header.to_str() {
            Err(e) => return Box::pin(async move { Err(ErrorUnauthorized(e)) }),
            Ok(token) => token.trim_start_matches("Bearer ").to_owned(),
        };
        match decode::<Claim>(&token, &DecodingKey::from_secret(&self.secret), &Validation::default()) {
            Err(e) => return Box::pin(async move { Err(ErrorUnauthorized(e)) }),
            Ok(data) => match data.claims.user.parse::<i32>() {
                Err(e) => return Box::pin(async move { Err(ErrorUnauthorized(e)) }),
                Ok(id) => {
                    req.extensions_mut().insert(AdminInfo {
                        id,
                        role: data.claims.role,
                    });
                }
            },
        }

        let res_fut = self.next_service.call(req);
        Box::pin(async move { res_fut.await.map_err(|e| e.into()) })
    }
}
