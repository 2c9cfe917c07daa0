#[macro_use]
extern crate rocket;

mod boot;
mod cms;
mod config;
mod db;
mod models;
mod render;
mod routes;

#[cfg(test)]
mod tests;

use rocket::response::content::RawHtml;

use cms::CmsClient;
use config::Config;

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let config = Config::load();

    // Boot check — verify/create directories, validate config
    boot::run(&config);

    let pool = db::init_pool(&config.site.data_dir).expect("Failed to initialize state pool");
    db::run_migrations(&pool).expect("Failed to run state migrations");

    let client = CmsClient::new(&config.cms).expect("Failed to build content client");

    eprintln!("Content host: {}", config.cms.base_url);

    rocket::build()
        .manage(pool)
        .manage(client)
        .manage(config)
        .mount("/", routes::pages::routes())
        .mount("/", routes::api::routes())
        .register("/", catchers![not_found, server_error])
}
