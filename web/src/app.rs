use leptos::prelude::*;
use shared::config::GarageConfig;
use shared::protocol::Command;
use shared::router::Route;
use tracing::info;

use crate::garage::{dispatch, GarageContext, GarageView};
use crate::scoreboard::SignalScoreboard;
use crate::winners::WinnersView;

fn config() -> GarageConfig {
    match option_env!("GARAGE_API_URL") {
        Some(url) => GarageConfig::default().with_base_url(url),
        None => GarageConfig::default(),
    }
}

fn current_route() -> Route {
    Route::from_hash(&location_hash().unwrap_or_default())
}

#[component]
pub fn App() -> impl IntoView {
    let config = config();
    info!("garage backend at {}", config.base_url);

    let board = SignalScoreboard::new();
    let ctx = GarageContext::new(&config, board);
    let route = RwSignal::new(current_route());

    let listener = window_event_listener_untyped("hashchange", move |_| {
        route.set(current_route());
    });
    on_cleanup(move || listener.remove());

    view! {
        <div class="min-h-screen bg-gray-100 p-8">
            <div class="max-w-5xl mx-auto">
                <nav class="flex gap-2 mb-6">
                    <button
                        class="bg-blue-500 text-white px-4 py-2 rounded"
                        on:click=move |_| dispatch(ctx, Command::Navigate(Route::Garage))
                    >
                        "Go to Garage"
                    </button>
                    <button
                        class="bg-blue-500 text-white px-4 py-2 rounded"
                        on:click=move |_| dispatch(ctx, Command::Navigate(Route::Winners))
                    >
                        "Go to Winners"
                    </button>
                </nav>
                {move || match route.get() {
                    Route::Garage => view! { <GarageView ctx=ctx /> }.into_any(),
                    Route::Winners => view! { <WinnersView board=board /> }.into_any(),
                    Route::NotFound => {
                        view! { <h1 class="text-3xl font-bold">"404 Not Found"</h1> }.into_any()
                    }
                }}
            </div>
        </div>
    }
}
