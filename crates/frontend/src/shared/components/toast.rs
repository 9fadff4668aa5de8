use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;

const TOAST_MS: u32 = 3000;

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub text: String,
    pub is_error: bool,
}

/// Show a transient notification; it clears itself unless a newer one
/// replaced it in the meantime.
pub fn push_toast(toast: RwSignal<Option<ToastMessage>>, text: impl Into<String>, is_error: bool) {
    let message = ToastMessage {
        text: text.into(),
        is_error,
    };
    toast.set(Some(message.clone()));

    leptos::task::spawn_local(async move {
        TimeoutFuture::new(TOAST_MS).await;
        toast.update(|current| {
            if current.as_ref() == Some(&message) {
                *current = None;
            }
        });
    });
}

#[component]
pub fn ToastHost(toast: RwSignal<Option<ToastMessage>>) -> impl IntoView {
    view! {
        {move || {
            toast
                .get()
                .map(|m| {
                    let class = if m.is_error { "toast toast--error" } else { "toast toast--success" };
                    view! { <div class=class>{m.text}</div> }
                })
        }}
    }
}
