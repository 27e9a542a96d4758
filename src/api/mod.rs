use rocket::Route;

pub mod admin;
pub mod auth;
pub mod polls;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(admin::routes());
    routes.extend(auth::routes());
    routes.extend(polls::routes());
    routes
}
