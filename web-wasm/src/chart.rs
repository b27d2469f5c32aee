//! 出席チャート（外部JSライブラリ）バインディング
//!
//! 描画はチャートライブラリに委譲する。初回呼び出しでドーナツチャートを
//! 生成し、以降はデータ差し替えのみ

use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/chart-bridge.js")]
extern "C" {
    /// 受付済み/未受付のドーナツチャートを更新する
    ///
    /// # Arguments
    /// * `canvas_id` - 描画先canvasのid
    /// * `scanned` / `pending` - 集計値
    #[wasm_bindgen(js_name = "updateAttendanceChart")]
    pub fn update_attendance_chart_js(canvas_id: &str, scanned: u32, pending: u32);
}
