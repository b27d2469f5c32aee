//! 進捗付きファイルアップロード
//!
//! fetchはアップロード進捗を取れないため、XMLHttpRequest + FormData を使う。
//! コールバックベースのXHRをoneshotチャネルでasyncに橋渡しする

use checkin_common::{Error, MessageResponse, Result};
use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};

use super::{error_text_from_body, network_err};

/// multipart形式でファイルをPOSTする
///
/// # Arguments
/// * `url` - アップロード先
/// * `file` - フォームの`file`フィールドとして送るファイル
/// * `on_progress` - 進捗コールバック（0-100）
pub async fn upload_file<F>(url: &str, file: &File, on_progress: F) -> Result<MessageResponse>
where
    F: Fn(f64) + 'static,
{
    let xhr = XmlHttpRequest::new().map_err(network_err)?;

    // 進捗イベント
    let progress = Closure::wrap(Box::new(move |ev: ProgressEvent| {
        if ev.length_computable() {
            on_progress(ev.loaded() / ev.total() * 100.0);
        }
    }) as Box<dyn FnMut(_)>);
    xhr.upload()
        .map_err(network_err)?
        .add_event_listener_with_callback("progress", progress.as_ref().unchecked_ref())
        .map_err(network_err)?;
    progress.forget();

    let (tx, rx) = oneshot::channel::<Result<MessageResponse>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    // 完了イベント（ステータスに応じて成否を判定する）
    let on_load = {
        let xhr = xhr.clone();
        let tx = tx.clone();
        Closure::wrap(Box::new(move |_: web_sys::Event| {
            let outcome = read_outcome(&xhr);
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(outcome);
            }
        }) as Box<dyn FnMut(_)>)
    };
    xhr.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())
        .map_err(network_err)?;
    on_load.forget();

    // 転送エラー
    let on_error = {
        let tx = tx.clone();
        Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(Error::Network("Network error".to_string())));
            }
        }) as Box<dyn FnMut(_)>)
    };
    xhr.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
        .map_err(network_err)?;
    on_error.forget();

    let form = FormData::new().map_err(network_err)?;
    form.append_with_blob("file", file).map_err(network_err)?;

    xhr.open("POST", url).map_err(network_err)?;
    xhr.send_with_opt_form_data(Some(&form)).map_err(network_err)?;

    rx.await
        .unwrap_or_else(|_| Err(Error::Network("Upload aborted".to_string())))
}

fn read_outcome(xhr: &XmlHttpRequest) -> Result<MessageResponse> {
    let status = xhr.status().unwrap_or(0);
    let body = xhr.response_text().ok().flatten().unwrap_or_default();

    if status == 200 {
        serde_json::from_str(&body)
            .map_err(|_| Error::Api("Invalid response format".to_string()))
    } else {
        let message = error_text_from_body(&body).unwrap_or_else(|| "Upload failed".to_string());
        Err(Error::Api(message))
    }
}
