//! 進捗バーコンポーネント

use leptos::prelude::*;

#[component]
pub fn ProgressBar(progress: ReadSignal<f64>, label: &'static str) -> impl IntoView {
    view! {
        <div class="progress-container">
            <div class="progress-bar">
                <div
                    class="progress-fill"
                    style=move || format!("width: {}%", progress.get())
                />
            </div>
            <p class="progress-text">
                {move || format!("{} {:.0}%", label, progress.get())}
            </p>
        </div>
    }
}
