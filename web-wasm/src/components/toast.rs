//! トースト通知
//!
//! 各ページの右上に通知を重ねて表示する。5秒で自動的に消える

use gloo::timers::callback::Timeout;
use leptos::prelude::*;

/// 通知種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastLevel {
    pub fn class(&self) -> &'static str {
        match self {
            ToastLevel::Success => "toast-success",
            ToastLevel::Error => "toast-error",
            ToastLevel::Warning => "toast-warning",
            ToastLevel::Info => "toast-info",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ToastLevel::Success => "Success",
            ToastLevel::Error => "Error",
            ToastLevel::Warning => "Warning",
            ToastLevel::Info => "Information",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub level: ToastLevel,
    pub message: String,
}

/// トースト表示用ハンドル
///
/// ページで1つ作り、イベントハンドラへコピーで配る
#[derive(Clone, Copy)]
pub struct Toasts {
    items: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u32>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    pub fn show(&self, level: ToastLevel, message: impl Into<String>) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);

        let message = message.into();
        self.items.update(|items| {
            items.push(Toast { id, level, message });
        });

        // 5秒で自動的に閉じる
        let items = self.items;
        Timeout::new(5_000, move || {
            items.update(|list| list.retain(|t| t.id != id));
        })
        .forget();
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastLevel::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(ToastLevel::Warning, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(ToastLevel::Info, message);
    }
}

#[component]
pub fn ToastHost(toasts: Toasts) -> impl IntoView {
    view! {
        <div class="toast-container">
            <For
                each=move || toasts.items.get()
                key=|toast| toast.id
                children=move |toast| {
                    view! {
                        <div class=format!("toast {}", toast.level.class())>
                            <strong class="toast-title">{toast.level.title()}</strong>
                            <span class="toast-body">{toast.message.clone()}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_classes() {
        assert_eq!(ToastLevel::Success.class(), "toast-success");
        assert_eq!(ToastLevel::Error.class(), "toast-error");
        assert_eq!(ToastLevel::Warning.class(), "toast-warning");
        assert_eq!(ToastLevel::Info.class(), "toast-info");
    }

    #[test]
    fn test_level_titles() {
        assert_eq!(ToastLevel::Success.title(), "Success");
        assert_eq!(ToastLevel::Info.title(), "Information");
    }
}
