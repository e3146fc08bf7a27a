use payloads::{APIClient, ClientConfig, ConfigError, config::DEFAULT_BASE_URL};
use yew::prelude::*;
use yew_router::prelude::*;

mod auth;
mod devices;
mod hooks;
mod logs;
mod state;

pub use auth::BrowserIdentity;
pub use state::State;

/// API config from build-time environment, resolved against the page URL.
pub fn client_config() -> Result<ClientConfig, ConfigError> {
    let page_url = web_sys::window().and_then(|window| window.location().href().ok());

    ClientConfig::new(
        option_env!("API_BASE_URL").unwrap_or(DEFAULT_BASE_URL),
        option_env!("AUTH_AUDIENCE"),
        page_url.as_deref(),
    )
}

pub fn get_api_client() -> Result<APIClient, ConfigError> {
    Ok(APIClient::new(client_config()?))
}

#[function_component]
pub fn App() -> Html {
    logs::init_logging();
    html! {
        <BrowserRouter>
            <div class="min-h-screen bg-white dark:bg-gray-900 text-gray-900 dark:text-gray-100 transition-colors">
                <Switch<Route> render={switch} />
            </div>
        </BrowserRouter>
    }
}

#[derive(Clone, Routable, PartialEq)]
enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! {
            <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                <devices::DevicesPage />
            </main>
        },
        Route::NotFound => html! {
            <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                <div class="text-center">
                    <h1 class="text-4xl font-bold text-gray-900 dark:text-white">{"404"}</h1>
                    <p class="text-gray-600 dark:text-gray-300">{"Page not found"}</p>
                </div>
            </main>
        },
    }
}
