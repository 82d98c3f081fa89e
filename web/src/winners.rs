use leptos::prelude::*;
use shared::winners::WinnerRow;

use crate::scoreboard::SignalScoreboard;

#[component]
pub fn WinnersView(board: SignalScoreboard) -> impl IntoView {
    let rows = move || board.winners.with(|winners| winners.rows());

    view! {
        <section class="bg-white rounded-lg shadow-lg p-6">
            <h2 class="text-xl font-semibold mb-4">
                {move || format!("Winners ({})", board.winners.with(|winners| winners.len()))}
            </h2>
            <Show
                when=move || board.winners.with(|winners| !winners.is_empty())
                fallback=|| view! { <p class="text-gray-500">"No races won yet."</p> }
            >
                <table class="w-full text-left">
                    <thead>
                        <tr>
                            <th>"#"</th>
                            <th>"Name"</th>
                            <th>"Wins"</th>
                            <th>"Best time (s)"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || rows().into_iter().enumerate()
                            key=|(place, row)| (*place, row.id, row.wins)
                            children=move |(place, row): (usize, WinnerRow)| {
                                view! {
                                    <tr>
                                        <td>{place + 1}</td>
                                        <td>{row.name.clone()}</td>
                                        <td>{row.wins}</td>
                                        <td>{format!("{:.2}", row.best_time_secs())}</td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </section>
    }
}
