//! QRデコーダ（外部JSライブラリ）バインディング
//!
//! デコード自体は外部ライブラリに委譲する。デコード面のRGBAピクセルを
//! 渡し、QRが見つかればペイロード文字列が返る

use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/qr-bridge.js")]
extern "C" {
    /// 1フレーム分のピクセルをデコードする
    ///
    /// # Arguments
    /// * `data` - RGBAピクセル列（width * height * 4バイト）
    /// * `width` / `height` - デコード面のサイズ
    ///
    /// # Returns
    /// デコードできた場合はペイロード文字列、見つからなければnull
    #[wasm_bindgen(js_name = "decodeQr")]
    pub fn decode_qr_js(data: &[u8], width: u32, height: u32) -> Option<String>;
}
