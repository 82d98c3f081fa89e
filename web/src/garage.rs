use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use shared::api::HttpApi;
use shared::config::GarageConfig;
use shared::generator::random_cars;
use shared::model::{Car, CarDraft, CarId, RaceEntry};
use shared::pagination::PageStep;
use shared::protocol::Command;
use shared::race::RaceCoordinator;
use shared::session::GarageState;
use tracing::{debug, info, warn};

use crate::scoreboard::SignalScoreboard;
use crate::track::{road_id, DomTrack};

type Coordinator = RaceCoordinator<HttpApi, DomTrack, SignalScoreboard>;

const CAR_PATH: &str = "M6 22c0-3 2-5 5-5h6l8-7c2-2 4-2 6-2h16c3 0 5 1 7 3l7 6h9c4 0 7 3 7 7v4c0 2-1 3-3 3h-5a7 7 0 0 0-14 0H30a7 7 0 0 0-14 0H9c-2 0-3-1-3-3z";

#[derive(Clone, Copy)]
pub struct CarForm {
    pub name: RwSignal<String>,
    pub color: RwSignal<String>,
}

impl CarForm {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            color: RwSignal::new("#ffffff".to_string()),
        }
    }

    fn clear(&self) {
        self.name.set(String::new());
        self.color.set("#ffffff".to_string());
    }
}

/// Everything the garage view and its handlers share. Outlives route changes
/// so the page, the selection and the race survive a trip to the winners view.
#[derive(Clone, Copy)]
pub struct GarageContext {
    coordinator: StoredValue<Rc<Coordinator>, LocalStorage>,
    pub state: RwSignal<GarageState>,
    pub board: SignalScoreboard,
    pub create_form: CarForm,
    pub update_form: CarForm,
    pub form_error: RwSignal<Option<String>>,
    generate_count: usize,
}

impl GarageContext {
    pub fn new(config: &GarageConfig, board: SignalScoreboard) -> Self {
        let coordinator = RaceCoordinator::new(
            HttpApi::new(config),
            DomTrack::new(config.track_correction),
            board,
            config,
        );
        Self {
            coordinator: StoredValue::new_local(Rc::new(coordinator)),
            state: RwSignal::new(GarageState::new(config.page_limit)),
            board,
            create_form: CarForm::new(),
            update_form: CarForm::new(),
            form_error: RwSignal::new(None),
            generate_count: config.generate_count,
        }
    }

    fn coordinator(self) -> Option<Rc<Coordinator>> {
        self.coordinator.try_get_value()
    }

    fn api(self) -> Option<HttpApi> {
        self.coordinator().map(|coordinator| coordinator.api().clone())
    }

    fn report(self, action: &str, err: impl std::fmt::Display) {
        warn!("{} failed: {}", action, err);
        self.form_error.set(Some(format!("{} failed: {}", action, err)));
    }

    async fn reload(self) {
        let Some(api) = self.api() else {
            return;
        };
        loop {
            let (page, limit) = self.state.with_untracked(|state| {
                (state.pagination.current_page(), state.pagination.limit())
            });
            match api.list_cars(page, limit).await {
                Ok(cars) => {
                    let moved_back = self.state.try_update(|state| state.load_page(cars));
                    if moved_back != Some(true) {
                        break;
                    }
                }
                Err(err) => {
                    self.report("loading the garage", err);
                    break;
                }
            }
        }
    }
}

pub fn refresh(ctx: GarageContext) {
    spawn_local(ctx.reload());
}

/// Routes one UI command to its handler.
pub fn dispatch(ctx: GarageContext, command: Command) {
    debug!("command {:?}", command);
    ctx.form_error.set(None);
    let Some(coordinator) = ctx.coordinator() else {
        return;
    };

    match command {
        Command::Go { id, name } => spawn_local(async move {
            if let Ok(finish) = coordinator.run_single(&RaceEntry { id, name }).await {
                info!("{} drove the track in {:.2}s", finish.name, finish.time_ms / 1000.0);
            }
        }),
        Command::Back { id } => coordinator.stop_single(id),
        Command::Race => {
            let entries = ctx.state.with_untracked(GarageState::entries);
            spawn_local(async move {
                if let Err(err) = coordinator.start_race(entries).await {
                    warn!("{}", err);
                }
            });
        }
        Command::Reset => {
            let ids = ctx.state.with_untracked(GarageState::ids);
            coordinator.reset_race(&ids);
        }
        Command::Generate => {
            let drafts = random_cars(&mut rand::thread_rng(), ctx.generate_count);
            let api = coordinator.api().clone();
            spawn_local(async move {
                match api.create_cars(&drafts).await {
                    Ok(cars) => info!("generated {} cars", cars.len()),
                    Err(err) => ctx.report("generating cars", err),
                }
                ctx.reload().await;
            });
        }
        Command::Page(step) => {
            if ctx.state.try_update(|state| state.pagination.step(step)) == Some(true) {
                refresh(ctx);
            }
        }
        Command::Create(draft) => {
            let api = coordinator.api().clone();
            spawn_local(async move {
                match api.create_car(&draft).await {
                    Ok(car) => {
                        info!("created car {} ({})", car.id, car.name);
                        ctx.create_form.clear();
                        ctx.reload().await;
                    }
                    Err(err) => ctx.report("creating the car", err),
                }
            });
        }
        Command::Select { id } => {
            let car = ctx.state.try_update(|state| {
                state.select(id);
                state.car(id).cloned()
            });
            if let Some(Some(car)) = car {
                ctx.update_form.name.set(car.name);
                ctx.update_form.color.set(car.color);
            }
        }
        Command::Update { name, color } => {
            let Some(Some((id, draft))) = ctx
                .state
                .try_update(|state| state.update_draft(&name, &color))
            else {
                return;
            };
            let api = coordinator.api().clone();
            ctx.update_form.clear();
            spawn_local(async move {
                match api.update_car(id, &draft).await {
                    Ok(_) => ctx.state.update(|state| state.apply_update(id, &draft)),
                    Err(err) => ctx.report("updating the car", err),
                }
            });
        }
        Command::Remove { id } => {
            let api = coordinator.api().clone();
            coordinator.stop_single(id);
            spawn_local(async move {
                match api.delete_car(id).await {
                    Ok(()) => {
                        ctx.board.winners.update(|board| {
                            board.forget(id);
                        });
                        ctx.reload().await;
                    }
                    Err(err) => ctx.report("removing the car", err),
                }
            });
        }
        Command::Navigate(route) => {
            if let Err(err) = window().location().set_hash(route.path()) {
                warn!("navigation failed: {:?}", err);
            }
        }
    }
}

fn submit_create(ctx: GarageContext) {
    let form = ctx.create_form;
    match CarDraft::new(form.name.get_untracked(), form.color.get_untracked()) {
        Ok(draft) => dispatch(ctx, Command::Create(draft)),
        Err(err) => ctx.form_error.set(Some(err.to_string())),
    }
}

#[component]
fn CarFields(form: CarForm, #[prop(into)] disabled: Signal<bool>) -> impl IntoView {
    view! {
        <input
            type="text"
            class="border rounded px-3 py-2 flex-1"
            prop:value=move || form.name.get()
            prop:disabled=move || disabled.get()
            on:input=move |ev| form.name.set(event_target_value(&ev))
        />
        <input
            type="color"
            class="h-10 w-12"
            prop:value=move || form.color.get()
            prop:disabled=move || disabled.get()
            on:input=move |ev| form.color.set(event_target_value(&ev))
        />
    }
}

#[component]
fn CarRow(ctx: GarageContext, id: CarId) -> impl IntoView {
    // The row is keyed by id only, so a rename repaints in place and a running
    // animation keeps its node.
    let field = move |pick: fn(&Car) -> &String| {
        ctx.state
            .with(|state| state.car(id).map(pick).cloned())
            .unwrap_or_default()
    };
    let name = move || field(|car| &car.name);
    let color = move || field(|car| &car.color);
    let current_name = move || {
        ctx.state
            .with_untracked(|state| state.car(id).map(|car| car.name.clone()))
            .unwrap_or_default()
    };

    view! {
        <li class="car py-2 border-b border-gray-200">
            <div class="flex gap-2 items-center mb-1">
                <button
                    class="select bg-gray-200 px-2 py-1 rounded"
                    on:click=move |_| dispatch(ctx, Command::Select { id })
                >
                    "Select"
                </button>
                <button
                    class="remove bg-gray-200 px-2 py-1 rounded"
                    on:click=move |_| dispatch(ctx, Command::Remove { id })
                >
                    "Remove"
                </button>
                <span class="car-name font-semibold">{name}</span>
            </div>
            <div class="road relative flex items-center" id=road_id(id)>
                <div class="flex flex-col gap-1 mr-2">
                    <button
                        class="go bg-green-500 text-white px-2 rounded"
                        on:click=move |_| dispatch(ctx, Command::Go { id, name: current_name() })
                    >
                        "GO"
                    </button>
                    <button
                        class="back bg-red-500 text-white px-2 rounded"
                        disabled=true
                        on:click=move |_| dispatch(ctx, Command::Back { id })
                    >
                        "BACK"
                    </button>
                </div>
                <div class="car-wrapper">
                    <svg width="80" height="40" viewBox="0 0 80 40">
                        <path fill=color d=CAR_PATH />
                    </svg>
                </div>
                <div class="flag absolute right-8">"🏁"</div>
            </div>
        </li>
    }
}

#[component]
pub fn GarageView(ctx: GarageContext) -> impl IntoView {
    refresh(ctx);
    let controls = ctx.board.controls;
    let nothing_selected = Signal::derive(move || ctx.state.with(|state| state.selected().is_none()));

    view! {
        <section class="bg-white rounded-lg shadow-lg p-6 mb-6">
            <div class="flex gap-2 mb-2">
                <CarFields form=ctx.create_form disabled=false />
                <button
                    class="bg-blue-500 text-white px-4 py-2 rounded"
                    on:click=move |_| submit_create(ctx)
                >
                    "Create"
                </button>
            </div>
            <div class="flex gap-2 mb-4">
                <CarFields form=ctx.update_form disabled=nothing_selected />
                <button
                    class="bg-blue-500 text-white px-4 py-2 rounded"
                    prop:disabled=move || nothing_selected.get()
                    on:click=move |_| {
                        dispatch(
                            ctx,
                            Command::Update {
                                name: ctx.update_form.name.get_untracked(),
                                color: ctx.update_form.color.get_untracked(),
                            },
                        )
                    }
                >
                    "Update"
                </button>
            </div>
            <div class="flex gap-2">
                <button
                    class="race bg-green-500 text-white px-4 py-2 rounded"
                    prop:disabled=move || !controls.get().race
                    on:click=move |_| dispatch(ctx, Command::Race)
                >
                    "Race"
                </button>
                <button
                    class="reset bg-yellow-500 text-white px-4 py-2 rounded"
                    prop:disabled=move || !controls.get().reset
                    on:click=move |_| dispatch(ctx, Command::Reset)
                >
                    "Reset"
                </button>
                <button
                    class="generate bg-purple-500 text-white px-4 py-2 rounded"
                    prop:disabled=move || !controls.get().generate
                    on:click=move |_| dispatch(ctx, Command::Generate)
                >
                    "Generate Cars"
                </button>
            </div>
            <Show when=move || ctx.form_error.get().is_some()>
                <div class="mt-4 p-3 bg-red-100 border border-red-400 text-red-700 rounded">
                    {move || ctx.form_error.get().unwrap_or_default()}
                </div>
            </Show>
        </section>

        <section class="bg-white rounded-lg shadow-lg p-6">
            <h2 class="text-xl font-semibold">{move || ctx.state.with(GarageState::title)}</h2>
            <h3 class="text-gray-600 mb-2">{move || ctx.state.with(|state| state.pagination.label())}</h3>
            <p class="winner text-2xl font-bold text-center">{move || ctx.board.banner.get()}</p>
            <ul class="cars">
                <For
                    each=move || ctx.state.with(GarageState::ids)
                    key=|id| *id
                    children=move |id| view! { <CarRow ctx=ctx id=id /> }
                />
            </ul>
            <div class="flex gap-2 mt-4">
                <button
                    class="prev bg-gray-200 px-4 py-2 rounded"
                    prop:disabled=move || !ctx.state.with(|state| state.pagination.has_prev())
                    on:click=move |_| dispatch(ctx, Command::Page(PageStep::Prev))
                >
                    "Prev"
                </button>
                <button
                    class="next bg-gray-200 px-4 py-2 rounded"
                    prop:disabled=move || !ctx.state.with(|state| state.pagination.has_next())
                    on:click=move |_| dispatch(ctx, Command::Page(PageStep::Next))
                >
                    "Next"
                </button>
            </div>
        </section>
    }
}
