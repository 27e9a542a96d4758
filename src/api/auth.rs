use log::info;
use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::Json,
    Route, State,
};

use crate::{
    error::{Error, Result},
    model::api::{
        admin::AdminCredentials,
        auth::{AuthToken, AUTH_TOKEN_COOKIE},
    },
    store::Store,
    Config,
};

pub fn routes() -> Vec<Route> {
    routes![authenticate, logout]
}

#[post("/auth/admin", data = "<credentials>", format = "json")]
pub async fn authenticate(
    cookies: &CookieJar<'_>,
    credentials: Json<AdminCredentials>,
    store: &State<Store>,
    config: &State<Config>,
) -> Result<()> {
    let admin = store
        .admin_by_username(&credentials.username)
        .await?
        .filter(|admin| admin.verify_password(&credentials.password))
        .ok_or_else(|| {
            Error::Status(
                Status::Unauthorized,
                "No admin found with the provided username and password combination.".to_string(),
            )
        })?;

    let token = AuthToken::new(&admin);
    cookies.add(token.into_cookie(config)?);
    info!("Admin '{}' logged in", admin.username);

    Ok(())
}

#[delete("/auth")]
pub fn logout(cookies: &CookieJar) -> Status {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Status::Ok
}

#[cfg(test)]
mod tests {
    use rocket::{http::ContentType, local::asynchronous::Client, serde::json::serde_json::json};

    use super::*;

    #[backend_test]
    async fn admin_authenticate_valid(client: Client) {
        // The test configuration bootstraps the example admin.
        let response = client
            .post(uri!(authenticate))
            .header(ContentType::JSON)
            .body(json!(AdminCredentials::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());
    }

    #[backend_test]
    async fn admin_authenticate_invalid(client: Client) {
        // Use invalid username to attempt admin login
        let response = client
            .post(uri!(authenticate))
            .header(ContentType::JSON)
            .body(json!(AdminCredentials::empty()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Unauthorized, response.status());
        assert_eq!(None, client.cookies().get(AUTH_TOKEN_COOKIE));

        // Use invalid password to attempt admin login
        let response = client
            .post(uri!(authenticate))
            .header(ContentType::JSON)
            .body(
                json! ({
                    "username": &AdminCredentials::example().username,
                    "password": "",
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(Status::Unauthorized, response.status());
        assert_eq!(None, client.cookies().get(AUTH_TOKEN_COOKIE));
    }

    #[backend_test]
    async fn second_admin_can_authenticate(client: Client, store: Store) {
        let credentials = AdminCredentials::example2();
        store
            .insert_admin(credentials.clone().try_into().unwrap())
            .await
            .unwrap();

        let response = client
            .post(uri!(authenticate))
            .header(ContentType::JSON)
            .body(json!(credentials).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let cookie = client.cookies().get(AUTH_TOKEN_COOKIE).cloned().unwrap();
        let config = client.rocket().state::<Config>().unwrap();
        let token = AuthToken::from_cookie(&cookie, config).unwrap();
        let admin = store
            .admin_by_username(&credentials.username)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.id, token.id);
    }

    #[backend_test(admin)]
    async fn logout_clears_cookie(client: Client) {
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());

        let response = client.delete(uri!(logout)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(None, client.cookies().get(AUTH_TOKEN_COOKIE));
    }
}
