mod context;
mod core;
mod database;
mod error;
mod handlers;
mod middlewares;
mod response;
mod storer;

use actix_web::web::{get, post, scope, Data};
use actix_web::HttpServer;
use database::sqlx::PgSqlxManager;
use middlewares::jwt::{Jwt, JWT_SECRET};
use sqlx::postgres::PgPoolOptions;
use storer::LocalDocumentStore;

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    std::env::set_var("RUST_LOG", "actix_web=info,cupos=info");
    env_logger::init();
    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let secret = dotenv::var(JWT_SECRET).expect("environment variable JWT_SECRET not been set");
    let document_base_url = dotenv::var("DOCUMENT_BASE_URL").expect("environment variable DOCUMENT_BASE_URL not been set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    log::info!("listening on 0.0.0.0:8000");
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(PgSqlxManager::new(pool.clone())))
            .app_data(Data::new(LocalDocumentStore::new(&document_base_url)))
            .service(
                scope("")
                    .wrap(Jwt::new(secret.as_bytes().to_owned()))
                    .service(
                        scope("requests").route("", get().to(handlers::enrollment::list)).service(
                            scope("{request_id}")
                                .route("approve", post().to(handlers::enrollment::approve))
                                .route("reject", post().to(handlers::enrollment::reject)),
                        ),
                    )
                    .service(scope("offers").service(scope("{offer_id}").route("available_slots", get().to(handlers::offer::available_slots))))
                    .service(
                        scope("participants").service(scope("{participant_id}").route("documents", get().to(handlers::participant::documents))),
                    ),
            )
    })
    .bind(("0.0.0.0", 8000))?
    .run()
    .await
}
